//! Domain operations over the persistence store.
//!
//! Each operation is one lookup plus one conditional write. Uniqueness is
//! checked up front and backed by UNIQUE constraints in the schema; when two
//! commands race past the check, the losing insert is reported as a
//! duplicate instead of an error.
//!
//! "Not found" and "already exists" are ordinary return values. Only
//! storage failures come back as [`StorageError`](crate::db::StorageError).
//!
//! - [`users`]: registration and authentication
//! - [`likes`]: liked tracks
//! - [`playlists`]: playlists and playlist membership

pub mod likes;
pub mod playlists;
pub mod users;

pub use likes::{like_track, list_liked_tracks};
pub use playlists::{
    MembershipOutcome, RenameOutcome, add_track_to_playlist, create_playlist, delete_playlist,
    find_playlist, find_playlist_by_id, get_playlist_track_summaries, get_playlist_tracks,
    list_user_playlists, remove_track_from_playlist, rename_playlist,
};
pub use users::{Registration, is_authenticated, list_users, register_user};

/// Current time as stored in timestamp columns.
///
/// Fixed-width RFC 3339 so that text ordering matches time ordering.
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
