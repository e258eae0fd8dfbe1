//! Remote music catalog integration.
//!
//! # Architecture
//!
//! Same split as the rest of our external integrations:
//! - **Domain models** (`domain.rs`) - our types, independent of the API
//! - **DTOs** (`dto.rs`) - exact API response shapes
//! - **Adapter** (`adapter.rs`) - DTO to domain conversion
//! - **Token cache** (`token.rs`) - one bearer token with an expiry
//! - **Client** (`client.rs`) - HTTP calls
//! - **Traits** (`traits.rs`) - seam for mocking the client in router tests
//!
//! # Usage
//!
//! ```ignore
//! use tunebot::catalog::{CatalogClient, SearchKind, extract_preview_url};
//!
//! let client = CatalogClient::new(&config.catalog, &config.credentials)?;
//! let results = client.search("Imagine", SearchKind::Track, 5).await?;
//! match extract_preview_url(&results) {
//!     Preview::Available { url, .. } => println!("preview: {url}"),
//!     other => println!("{other:?}"),
//! }
//! ```

mod adapter;
mod client;
pub mod domain;
pub mod dto;
mod token;
pub mod traits;

pub use client::CatalogClient;
pub use domain::{
    AlbumInfo, ArtistInfo, CatalogError, EpisodeInfo, Preview, SearchKind, SearchResults,
    TrackInfo, extract_preview_url,
};
pub use token::TokenCache;
pub use traits::CatalogApi;
