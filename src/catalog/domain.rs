//! Internal domain models for catalog results.
//!
//! These types are OUR types - they don't change when the catalog API does.
//! All API responses get converted into these types via the adapter.

use std::fmt;
use std::str::FromStr;

/// What to search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKind {
    Track,
    Artist,
    Album,
    Episode,
}

impl SearchKind {
    /// Value of the `type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Artist => "artist",
            Self::Album => "album",
            Self::Episode => "episode",
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "track" => Ok(Self::Track),
            "artist" => Ok(Self::Artist),
            "album" => Ok(Self::Album),
            "episode" => Ok(Self::Episode),
            other => Err(format!("unknown search type '{other}'")),
        }
    }
}

/// A track as shown to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    /// Catalog track ID
    pub id: String,
    pub name: String,
    /// Artist names joined with ", "
    pub artists: String,
    pub album: String,
    /// 30-second preview, if the catalog offers one
    pub preview_url: Option<String>,
}

/// An artist search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistInfo {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
}

/// An album search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumInfo {
    pub id: String,
    pub name: String,
    pub artists: String,
    pub release_date: String,
}

/// A podcast episode search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeInfo {
    pub id: String,
    pub name: String,
    pub preview_url: Option<String>,
}

/// Search hits grouped by kind. Kinds that weren't requested stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub tracks: Vec<TrackInfo>,
    pub artists: Vec<ArtistInfo>,
    pub albums: Vec<AlbumInfo>,
    pub episodes: Vec<EpisodeInfo>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
            && self.artists.is_empty()
            && self.albums.is_empty()
            && self.episodes.is_empty()
    }
}

/// Outcome of looking for a playable preview in search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// A preview URL is available.
    Available {
        url: String,
        title: String,
        performer: Option<String>,
    },
    /// The item exists but has no preview.
    Unavailable {
        title: String,
        performer: Option<String>,
    },
    /// No track or episode in the results.
    NothingFound,
}

/// Pick the preview of the first track, falling back to the first episode.
///
/// Never fails: a missing preview is reported as [`Preview::Unavailable`].
pub fn extract_preview_url(results: &SearchResults) -> Preview {
    if let Some(track) = results.tracks.first() {
        let performer = (!track.artists.is_empty()).then(|| track.artists.clone());
        return match &track.preview_url {
            Some(url) => Preview::Available {
                url: url.clone(),
                title: track.name.clone(),
                performer,
            },
            None => Preview::Unavailable {
                title: track.name.clone(),
                performer,
            },
        };
    }

    if let Some(episode) = results.episodes.first() {
        return match &episode.preview_url {
            Some(url) => Preview::Available {
                url: url.clone(),
                title: episode.name.clone(),
                performer: None,
            },
            None => Preview::Unavailable {
                title: episode.name.clone(),
                performer: None,
            },
        };
    }

    Preview::NothingFound
}

/// Errors from the remote catalog.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog credentials are not configured")]
    MissingCredentials,

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}
