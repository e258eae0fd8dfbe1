//! Catalog HTTP client
//!
//! Authenticates with the client-credentials flow and calls the search and
//! track endpoints with a bearer token. The token is cached in a
//! [`TokenCache`] owned by the client.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

use super::domain::{CatalogError, SearchKind, SearchResults, TrackInfo};
use super::token::TokenCache;
use super::{adapter, dto};
use crate::config::{CatalogConfig, Credentials};

/// User agent string sent with every request
const USER_AGENT: &str = concat!("tunebot/", env!("CARGO_PKG_VERSION"));

/// Catalog API client
pub struct CatalogClient {
    http_client: reqwest::Client,
    token_url: String,
    api_base: String,
    credentials: Credentials,
    tokens: TokenCache,
}

impl CatalogClient {
    /// Create a client from configuration.
    ///
    /// Missing credentials are not an error here; the first call that
    /// needs a token fails with [`CatalogError::MissingCredentials`].
    pub fn new(config: &CatalogConfig, credentials: &Credentials) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            token_url: config.token_url.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            credentials: credentials.clone(),
            tokens: TokenCache::new(Duration::from_secs(config.token_ttl_secs)),
        })
    }

    /// Create a client for testing against a mock server
    #[cfg(test)]
    pub fn with_base_url(base_url: &str, ttl: Duration) -> Self {
        let config = CatalogConfig {
            token_url: format!("{base_url}/api/token"),
            api_base: format!("{base_url}/v1"),
            token_ttl_secs: ttl.as_secs(),
            ..Default::default()
        };
        let credentials = Credentials {
            client_id: Some("test-id".to_string()),
            client_secret: Some("test-secret".to_string()),
        };
        Self::new(&config, &credentials).expect("Failed to build HTTP client")
    }

    /// Search the catalog.
    pub async fn search(
        &self,
        query: &str,
        kind: SearchKind,
        limit: u32,
    ) -> Result<SearchResults, CatalogError> {
        let url = format!(
            "{}/search?q={}&type={}&limit={}",
            self.api_base,
            urlencoding::encode(query),
            kind.as_str(),
            limit
        );
        debug!(target: "tunebot::catalog", query, kind = %kind, limit, "Searching catalog");

        let response: dto::SearchResponse = self.get_json(&url).await?;
        Ok(adapter::to_search_results(response))
    }

    /// Look up a single track by catalog ID.
    pub async fn get_track(&self, track_id: &str) -> Result<TrackInfo, CatalogError> {
        let url = format!("{}/tracks/{}", self.api_base, urlencoding::encode(track_id));
        debug!(target: "tunebot::catalog", track = track_id, "Fetching track");

        let track: dto::Track = self.get_json(&url).await?;
        Ok(adapter::to_track(track))
    }

    /// Download preview audio. Preview URLs are public and need no token.
    pub async fn download_preview(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;
        let response = check_status(response).await?;

        let data = response
            .bytes()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;
        Ok(data.to_vec())
    }

    /// Authenticated GET that decodes a JSON body.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        let token = self.access_token().await?;

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            // Revoked or expired early; make the next call fetch a fresh one.
            warn!(target: "tunebot::catalog", "Catalog rejected access token");
            self.tokens.clear();
        }

        let response = check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }

    async fn access_token(&self) -> Result<String, CatalogError> {
        self.tokens.get_or_refresh(|| self.request_token()).await
    }

    /// Client-credentials grant. Returns the token and its server lifetime.
    async fn request_token(&self) -> Result<(String, Option<Duration>), CatalogError> {
        let (client_id, client_secret) = self
            .credentials
            .pair()
            .ok_or(CatalogError::MissingCredentials)?;

        let body = format!(
            "grant_type=client_credentials&client_id={}&client_secret={}",
            urlencoding::encode(client_id),
            urlencoding::encode(client_secret)
        );

        let response = self
            .http_client
            .post(&self.token_url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let response = check_status(response).await?;
        let token = response
            .json::<dto::TokenResponse>()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))?;

        debug!(target: "tunebot::catalog", expires_in = ?token.expires_in, "Obtained access token");
        Ok((token.access_token, token.expires_in.map(Duration::from_secs)))
    }
}

/// Turn a non-success response into [`CatalogError::Status`].
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if let Ok(api) = serde_json::from_str::<dto::ApiError>(&body) {
        api.error.message
    } else if let Ok(auth) = serde_json::from_str::<dto::AuthError>(&body) {
        auth.error_description.unwrap_or(auth.error)
    } else {
        status.canonical_reason().unwrap_or("Unknown").to_string()
    };

    Err(CatalogError::Status {
        status: status.as_u16(),
        message,
    })
}
