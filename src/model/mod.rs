//! Core data models for the bot's storage.
//!
//! Defines the rows read back by the library: [`User`], [`Playlist`] and
//! the listing models [`TrackSummary`], [`PlaylistSummary`] and
//! [`PlaylistEntry`]. All of them derive SQLx's `FromRow`.
//!
//! # Database Schema
//!
//! The models map to the following tables:
//! - `users` - one row per messaging-platform identity
//! - `liked_tracks` - denormalized track metadata, unique per (user, track)
//! - `playlists` - named playlists, unique per (user, name)
//! - `playlist_tracks` - playlist membership, unique per (playlist, track)
//!
//! `user_id` columns hold the external (platform) identity, not `users.id`.

use sqlx::FromRow;

/// External user identity assigned by the messaging platform.
pub type UserId = i64;

/// Database ID of a playlist.
pub type PlaylistId = i64;

/// A registered user.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// Database ID (auto-generated)
    pub id: Option<i64>,
    /// Messaging-platform identity (unique)
    pub telegram_id: UserId,
    /// Platform username, if the user has one
    pub username: Option<String>,
    /// Creation timestamp
    pub created_at: Option<String>,
}

/// Display fields of a liked track.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TrackSummary {
    pub track_id: String,
    pub track_name: String,
    pub artist_name: String,
    pub album_name: String,
}

/// A named playlist owned by one user.
#[derive(Debug, Clone, FromRow)]
pub struct Playlist {
    pub id: PlaylistId,
    pub user_id: UserId,
    pub name: String,
    pub created_at: Option<String>,
}

/// Playlist listing entry.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PlaylistSummary {
    pub id: PlaylistId,
    pub name: String,
}

/// A playlist entry joined against the owner's liked tracks.
///
/// Display fields are `None` when the owner never liked the track.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PlaylistEntry {
    pub track_id: String,
    pub added_at: Option<String>,
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub album_name: Option<String>,
}

impl PlaylistEntry {
    /// Whether display metadata was found for this entry.
    pub fn is_resolved(&self) -> bool {
        self.track_name.is_some()
    }
}
