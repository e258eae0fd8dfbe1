//! Trait seam over the catalog client.
//!
//! The bot router holds an `Arc<dyn CatalogApi>` so tests can swap in
//! [`mocks::MockCatalog`] instead of talking to the network.

use async_trait::async_trait;

use super::client::CatalogClient;
use super::domain::{CatalogError, SearchKind, SearchResults, TrackInfo};

/// Remote catalog operations used by the bot.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Search for `query`, returning at most `limit` hits of `kind`.
    async fn search(
        &self,
        query: &str,
        kind: SearchKind,
        limit: u32,
    ) -> Result<SearchResults, CatalogError>;

    /// Look up one track by ID.
    async fn get_track(&self, track_id: &str) -> Result<TrackInfo, CatalogError>;

    /// Fetch the bytes behind a preview URL.
    async fn download_preview(&self, url: &str) -> Result<Vec<u8>, CatalogError>;
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn search(
        &self,
        query: &str,
        kind: SearchKind,
        limit: u32,
    ) -> Result<SearchResults, CatalogError> {
        CatalogClient::search(self, query, kind, limit).await
    }

    async fn get_track(&self, track_id: &str) -> Result<TrackInfo, CatalogError> {
        CatalogClient::get_track(self, track_id).await
    }

    async fn download_preview(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        CatalogClient::download_preview(self, url).await
    }
}
