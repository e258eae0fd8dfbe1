//! User registration.

use tracing::{debug, info, warn};

use super::now_timestamp;
use crate::db::{StorageError, Store};
use crate::model::{User, UserId};

/// What [`register_user`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// A new row was written.
    Created,
    /// The user was already registered; nothing changed.
    Existing,
    /// A row with an unreadable primary key was replaced.
    Repaired,
}

/// Register a user on first contact.
///
/// Idempotent: an existing row is left alone. A row whose `id` reads back
/// as NULL is deleted and inserted again.
pub async fn register_user(
    store: &Store,
    telegram_id: UserId,
    username: Option<&str>,
) -> Result<Registration, StorageError> {
    let existing: Option<(Option<i64>,)> = store
        .fetch_one(sqlx::query_as("SELECT id FROM users WHERE telegram_id = ?").bind(telegram_id))
        .await?;

    match existing {
        Some((Some(id),)) => {
            debug!(user = telegram_id, id, "User already registered");
            Ok(Registration::Existing)
        }
        // Only reachable on a users table created before `id` was
        // `INTEGER PRIMARY KEY`, where it could be left NULL.
        Some((None,)) => {
            warn!(user = telegram_id, "User row has no primary key, recreating");
            store
                .execute(sqlx::query("DELETE FROM users WHERE telegram_id = ?").bind(telegram_id))
                .await?;
            insert_user(store, telegram_id, username).await?;
            Ok(Registration::Repaired)
        }
        None => match insert_user(store, telegram_id, username).await {
            Ok(()) => {
                info!(user = telegram_id, username = ?username, "Registered new user");
                Ok(Registration::Created)
            }
            Err(e) if e.is_unique_violation() => Ok(Registration::Existing),
            Err(e) => Err(e),
        },
    }
}

async fn insert_user(
    store: &Store,
    telegram_id: UserId,
    username: Option<&str>,
) -> Result<(), StorageError> {
    store
        .execute(
            sqlx::query("INSERT INTO users (telegram_id, username, created_at) VALUES (?, ?, ?)")
                .bind(telegram_id)
                .bind(username)
                .bind(now_timestamp()),
        )
        .await?;
    Ok(())
}

/// True iff a user row exists for this identity.
pub async fn is_authenticated(store: &Store, telegram_id: UserId) -> Result<bool, StorageError> {
    let row: Option<(i64,)> = store
        .fetch_one(sqlx::query_as("SELECT COUNT(*) FROM users WHERE telegram_id = ?").bind(telegram_id))
        .await?;
    Ok(row.is_some_and(|(count,)| count > 0))
}

/// All registered users, oldest first.
pub async fn list_users(store: &Store) -> Result<Vec<User>, StorageError> {
    store
        .fetch_all(sqlx::query_as::<_, User>(
            "SELECT id, telegram_id, username, created_at FROM users ORDER BY id",
        ))
        .await
}
