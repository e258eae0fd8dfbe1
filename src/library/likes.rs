//! Liked tracks.

use tracing::{debug, info};

use super::now_timestamp;
use crate::db::{StorageError, Store};
use crate::model::{TrackSummary, UserId};

/// Record that `user` likes a track.
///
/// Returns `true` when a row was written and `false` when the pair was
/// already present (including when a concurrent like won the race).
pub async fn like_track(
    store: &Store,
    user: UserId,
    track_id: &str,
    track_name: &str,
    artist_name: &str,
    album_name: &str,
) -> Result<bool, StorageError> {
    let existing: Option<(i64,)> = store
        .fetch_one(
            sqlx::query_as("SELECT id FROM liked_tracks WHERE user_id = ? AND track_id = ?")
                .bind(user)
                .bind(track_id),
        )
        .await?;

    if existing.is_some() {
        debug!(user, track = track_id, "Track already liked");
        return Ok(false);
    }

    let result = store
        .execute(
            sqlx::query(
                r#"
                INSERT INTO liked_tracks
                    (user_id, track_id, track_name, artist_name, album_name, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(user)
            .bind(track_id)
            .bind(track_name)
            .bind(artist_name)
            .bind(album_name)
            .bind(now_timestamp()),
        )
        .await;

    match result {
        Ok(_) => {
            info!(user, track = track_id, "Liked track");
            Ok(true)
        }
        Err(e) if e.is_unique_violation() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Everything `user` has liked, in storage order.
pub async fn list_liked_tracks(
    store: &Store,
    user: UserId,
) -> Result<Vec<TrackSummary>, StorageError> {
    store
        .fetch_all(
            sqlx::query_as::<_, TrackSummary>(
                r#"
                SELECT track_id, track_name, artist_name, album_name
                FROM liked_tracks
                WHERE user_id = ?
                ORDER BY id
                "#,
            )
            .bind(user),
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::register_user;
    use crate::test_utils::{count_rows, temp_store};

    #[tokio::test]
    async fn test_like_then_list() {
        let (store, _dir) = temp_store().await;
        register_user(&store, 42, Some("alice")).await.unwrap();

        let inserted = like_track(&store, 42, "t1", "Song", "Artist", "Album")
            .await
            .unwrap();
        assert!(inserted);

        let liked = list_liked_tracks(&store, 42).await.unwrap();
        assert_eq!(
            liked,
            vec![TrackSummary {
                track_id: "t1".to_string(),
                track_name: "Song".to_string(),
                artist_name: "Artist".to_string(),
                album_name: "Album".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_liking_twice_keeps_one_row() {
        let (store, _dir) = temp_store().await;

        assert!(like_track(&store, 1, "t1", "A", "B", "C").await.unwrap());
        assert!(!like_track(&store, 1, "t1", "A", "B", "C").await.unwrap());

        assert_eq!(count_rows(&store, "liked_tracks").await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_likes_keep_one_row() {
        let (store, _dir) = temp_store().await;

        let (a, b) = tokio::join!(
            like_track(&store, 1, "t1", "A", "B", "C"),
            like_track(&store, 1, "t1", "A", "B", "C")
        );
        let inserted = [a.unwrap(), b.unwrap()];
        assert_eq!(inserted.iter().filter(|i| **i).count(), 1);
        assert_eq!(count_rows(&store, "liked_tracks").await, 1);
    }

    #[tokio::test]
    async fn test_likes_are_per_user() {
        let (store, _dir) = temp_store().await;

        like_track(&store, 1, "t1", "A", "B", "C").await.unwrap();
        assert!(like_track(&store, 2, "t1", "A", "B", "C").await.unwrap());

        assert_eq!(list_liked_tracks(&store, 1).await.unwrap().len(), 1);
        assert_eq!(list_liked_tracks(&store, 2).await.unwrap().len(), 1);
        assert!(list_liked_tracks(&store, 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let (store, _dir) = temp_store().await;
        for id in ["b", "a", "c"] {
            like_track(&store, 1, id, id, "x", "y").await.unwrap();
        }

        let ids: Vec<String> = list_liked_tracks(&store, 1)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.track_id)
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }
}
