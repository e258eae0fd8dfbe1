//! Catalog API Data Transfer Objects
//!
//! These types match what the Web API returns for the endpoints we call.
//! DO NOT use these types outside the catalog module - convert to domain types.
//!
//! Endpoints:
//! - `POST /api/token` (client credentials) -> [`TokenResponse`]
//! - `GET /v1/search` -> [`SearchResponse`]
//! - `GET /v1/tracks/{id}` -> [`Track`]

use serde::{Deserialize, Serialize};

/// Client-credentials token response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Usually "Bearer"
    pub token_type: Option<String>,
    /// Lifetime in seconds
    pub expires_in: Option<u64>,
}

/// Search response. Only the requested kinds are present.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearchResponse {
    pub tracks: Option<Paging<Track>>,
    pub artists: Option<Paging<Artist>>,
    pub albums: Option<Paging<Album>>,
    pub episodes: Option<Paging<Episode>>,
}

/// A page of results.
///
/// The API sometimes returns `null` entries inside `items`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<Option<T>>,
    pub total: Option<u64>,
}

/// Full track object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
    pub album: Option<SimpleAlbum>,
    pub preview_url: Option<String>,
    pub duration_ms: Option<u64>,
}

/// Artist reference inside tracks and albums.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimpleArtist {
    pub id: Option<String>,
    pub name: String,
}

/// Album reference inside a track.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimpleAlbum {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Full artist object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Artist {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// Album search hit.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Album {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
    /// YYYY, YYYY-MM, or YYYY-MM-DD
    pub release_date: Option<String>,
}

/// Podcast episode search hit.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Episode {
    pub id: Option<String>,
    pub name: Option<String>,
    pub audio_preview_url: Option<String>,
}

/// Error body of the Web API (`{"error": {"status": .., "message": ..}}`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorDetail {
    pub status: Option<u16>,
    pub message: String,
}

/// Error body of the token endpoint (`{"error": "invalid_client", ...}`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthError {
    pub error: String,
    pub error_description: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_token_response() {
        let json = r#"{
            "access_token": "BQDx",
            "token_type": "Bearer",
            "expires_in": 3600
        }"#;

        let token: TokenResponse = serde_json::from_str(json).expect("Should parse token");
        assert_eq!(token.access_token, "BQDx");
        assert_eq!(token.expires_in, Some(3600));
    }

    #[test]
    fn test_parse_track_search() {
        let json = r#"{
            "tracks": {
                "href": "https://api.example/v1/search?query=imagine&type=track",
                "total": 1,
                "items": [{
                    "id": "7pKfPomDEeI4TPT6EOYjn9",
                    "name": "Imagine",
                    "artists": [{"id": "4x1n", "name": "John Lennon"}],
                    "album": {"id": "0xzI", "name": "Imagine", "album_type": "album"},
                    "preview_url": null,
                    "duration_ms": 183000,
                    "popularity": 80
                }]
            }
        }"#;

        let response: SearchResponse =
            serde_json::from_str(json).expect("Should parse track search");
        let tracks = response.tracks.expect("tracks present");
        assert_eq!(tracks.total, Some(1));
        let track = tracks.items[0].as_ref().expect("item present");
        assert_eq!(track.name.as_deref(), Some("Imagine"));
        assert_eq!(track.artists[0].name, "John Lennon");
        assert!(track.preview_url.is_none());
        assert!(response.artists.is_none());
    }

    #[test]
    fn test_parse_null_items() {
        let json = r#"{"albums": {"items": [null, {"id": "a1", "name": "Abbey Road",
            "artists": [{"name": "The Beatles"}], "release_date": "1969-09-26"}]}}"#;

        let response: SearchResponse = serde_json::from_str(json).expect("Should parse");
        let albums = response.albums.expect("albums present");
        assert_eq!(albums.items.len(), 2);
        assert!(albums.items[0].is_none());
        assert_eq!(
            albums.items[1].as_ref().unwrap().release_date.as_deref(),
            Some("1969-09-26")
        );
    }

    #[test]
    fn test_parse_artist_and_episode() {
        let json = r#"{
            "artists": {"items": [{"id": "a", "name": "Queen", "genres": ["rock", "glam rock"]}]},
            "episodes": {"items": [{"id": "e", "name": "Ep 1", "audio_preview_url": "https://p/e.mp3"}]}
        }"#;

        let response: SearchResponse = serde_json::from_str(json).expect("Should parse");
        let artist = response.artists.unwrap().items.remove(0).unwrap();
        assert_eq!(artist.genres, vec!["rock", "glam rock"]);
        let episode = response.episodes.unwrap().items.remove(0).unwrap();
        assert_eq!(episode.audio_preview_url.as_deref(), Some("https://p/e.mp3"));
    }

    #[test]
    fn test_parse_error_bodies() {
        let api: ApiError =
            serde_json::from_str(r#"{"error": {"status": 401, "message": "The access token expired"}}"#)
                .unwrap();
        assert_eq!(api.error.status, Some(401));

        let auth: AuthError = serde_json::from_str(
            r#"{"error": "invalid_client", "error_description": "Invalid client secret"}"#,
        )
        .unwrap();
        assert_eq!(auth.error, "invalid_client");
    }
}
