//! Playlists and playlist membership.
//!
//! Membership changes take the requesting user and check that the playlist
//! belongs to them before touching `playlist_tracks`. A playlist owned by
//! someone else is indistinguishable from one that doesn't exist.

use tracing::{debug, info};

use super::now_timestamp;
use crate::db::{StorageError, Store};
use crate::model::{Playlist, PlaylistEntry, PlaylistId, PlaylistSummary, UserId};

/// Result of [`rename_playlist`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed,
    /// No playlist with the old name; zero rows changed.
    NotFound,
    /// The user already has a playlist with the new name.
    NameTaken,
}

/// Result of a membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipOutcome {
    Added,
    AlreadyPresent,
    Removed,
    NotInPlaylist,
    /// The playlist doesn't exist or belongs to another user.
    PlaylistNotFound,
}

/// Create a playlist. Returns `false` if the user already has one by that name.
pub async fn create_playlist(
    store: &Store,
    user: UserId,
    name: &str,
) -> Result<bool, StorageError> {
    if find_playlist(store, user, name).await?.is_some() {
        debug!(user, playlist = name, "Playlist already exists");
        return Ok(false);
    }

    let result = store
        .execute(
            sqlx::query("INSERT INTO playlists (user_id, name, created_at) VALUES (?, ?, ?)")
                .bind(user)
                .bind(name)
                .bind(now_timestamp()),
        )
        .await;

    match result {
        Ok(_) => {
            info!(user, playlist = name, "Created playlist");
            Ok(true)
        }
        Err(e) if e.is_unique_violation() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Rename one of the user's playlists.
pub async fn rename_playlist(
    store: &Store,
    user: UserId,
    old_name: &str,
    new_name: &str,
) -> Result<RenameOutcome, StorageError> {
    let result = store
        .execute(
            sqlx::query("UPDATE playlists SET name = ? WHERE name = ? AND user_id = ?")
                .bind(new_name)
                .bind(old_name)
                .bind(user),
        )
        .await;

    match result {
        Ok(0) => Ok(RenameOutcome::NotFound),
        Ok(_) => {
            info!(user, from = old_name, to = new_name, "Renamed playlist");
            Ok(RenameOutcome::Renamed)
        }
        Err(e) if e.is_unique_violation() => Ok(RenameOutcome::NameTaken),
        Err(e) => Err(e),
    }
}

/// Delete one of the user's playlists together with its memberships.
///
/// Returns `false` when no playlist matched.
pub async fn delete_playlist(store: &Store, user: UserId, name: &str) -> Result<bool, StorageError> {
    // The schema cascades too; this keeps the guarantee if foreign keys are off.
    let memberships = store
        .execute(
            sqlx::query(
                r#"
                DELETE FROM playlist_tracks
                WHERE playlist_id IN (SELECT id FROM playlists WHERE user_id = ? AND name = ?)
                "#,
            )
            .bind(user)
            .bind(name),
        )
        .await?;

    let deleted = store
        .execute(
            sqlx::query("DELETE FROM playlists WHERE name = ? AND user_id = ?")
                .bind(name)
                .bind(user),
        )
        .await?;

    if deleted > 0 {
        info!(user, playlist = name, memberships, "Deleted playlist");
    }
    Ok(deleted > 0)
}

/// Look up a playlist by owner and name.
pub async fn find_playlist(
    store: &Store,
    user: UserId,
    name: &str,
) -> Result<Option<Playlist>, StorageError> {
    store
        .fetch_one(
            sqlx::query_as::<_, Playlist>(
                "SELECT id, user_id, name, created_at FROM playlists WHERE user_id = ? AND name = ?",
            )
            .bind(user)
            .bind(name),
        )
        .await
}

/// Look up a playlist by ID, only if `user` owns it.
pub async fn find_playlist_by_id(
    store: &Store,
    user: UserId,
    playlist_id: PlaylistId,
) -> Result<Option<Playlist>, StorageError> {
    store
        .fetch_one(
            sqlx::query_as::<_, Playlist>(
                "SELECT id, user_id, name, created_at FROM playlists WHERE id = ? AND user_id = ?",
            )
            .bind(playlist_id)
            .bind(user),
        )
        .await
}

/// Add a track to a playlist owned by `user`. Idempotent.
pub async fn add_track_to_playlist(
    store: &Store,
    user: UserId,
    playlist_id: PlaylistId,
    track_id: &str,
) -> Result<MembershipOutcome, StorageError> {
    if find_playlist_by_id(store, user, playlist_id).await?.is_none() {
        return Ok(MembershipOutcome::PlaylistNotFound);
    }

    let inserted = store
        .execute(
            sqlx::query(
                r#"
                INSERT INTO playlist_tracks (playlist_id, track_id, added_at)
                VALUES (?, ?, ?)
                ON CONFLICT(playlist_id, track_id) DO NOTHING
                "#,
            )
            .bind(playlist_id)
            .bind(track_id)
            .bind(now_timestamp()),
        )
        .await?;

    if inserted == 0 {
        return Ok(MembershipOutcome::AlreadyPresent);
    }
    info!(user, playlist = playlist_id, track = track_id, "Added track to playlist");
    Ok(MembershipOutcome::Added)
}

/// Remove a track from a playlist owned by `user`.
pub async fn remove_track_from_playlist(
    store: &Store,
    user: UserId,
    playlist_id: PlaylistId,
    track_id: &str,
) -> Result<MembershipOutcome, StorageError> {
    if find_playlist_by_id(store, user, playlist_id).await?.is_none() {
        return Ok(MembershipOutcome::PlaylistNotFound);
    }

    let removed = store
        .execute(
            sqlx::query("DELETE FROM playlist_tracks WHERE playlist_id = ? AND track_id = ?")
                .bind(playlist_id)
                .bind(track_id),
        )
        .await?;

    if removed == 0 {
        return Ok(MembershipOutcome::NotInPlaylist);
    }
    info!(user, playlist = playlist_id, track = track_id, "Removed track from playlist");
    Ok(MembershipOutcome::Removed)
}

/// The user's playlists, newest first.
pub async fn list_user_playlists(
    store: &Store,
    user: UserId,
) -> Result<Vec<PlaylistSummary>, StorageError> {
    store
        .fetch_all(
            sqlx::query_as::<_, PlaylistSummary>(
                "SELECT id, name FROM playlists WHERE user_id = ? ORDER BY created_at DESC, id DESC",
            )
            .bind(user),
        )
        .await
}

/// Track IDs in a playlist, in the order they were added.
pub async fn get_playlist_tracks(
    store: &Store,
    playlist_id: PlaylistId,
) -> Result<Vec<String>, StorageError> {
    let rows: Vec<(String,)> = store
        .fetch_all(
            sqlx::query_as("SELECT track_id FROM playlist_tracks WHERE playlist_id = ? ORDER BY id")
                .bind(playlist_id),
        )
        .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Playlist entries with display metadata from the owner's liked tracks.
///
/// Entries the owner never liked are kept with empty display fields.
/// Returns an empty list when `user` doesn't own the playlist.
pub async fn get_playlist_track_summaries(
    store: &Store,
    user: UserId,
    playlist_id: PlaylistId,
) -> Result<Vec<PlaylistEntry>, StorageError> {
    store
        .fetch_all(
            sqlx::query_as::<_, PlaylistEntry>(
                r#"
                SELECT
                    pt.track_id, pt.added_at,
                    lt.track_name, lt.artist_name, lt.album_name
                FROM playlist_tracks pt
                INNER JOIN playlists p ON p.id = pt.playlist_id
                LEFT JOIN liked_tracks lt
                    ON lt.track_id = pt.track_id AND lt.user_id = p.user_id
                WHERE pt.playlist_id = ? AND p.user_id = ?
                ORDER BY pt.id
                "#,
            )
            .bind(playlist_id)
            .bind(user),
        )
        .await
}
