//! Persistence store for users, liked tracks, and playlists.
//!
//! Uses SQLx with SQLite for lightweight, embedded database storage.
//! The [`Store`] owns a single connection and exposes three primitives:
//! - [`Store::execute`] for mutating statements (returns rows affected)
//! - [`Store::fetch_one`] for at most one row
//! - [`Store::fetch_all`] for every matching row
//!
//! Domain rules (uniqueness, ownership) live in [`crate::library`].
//!
//! # Example
//!
//! ```ignore
//! use tunebot::db::{Store, db_url};
//!
//! let store = Store::open(&db_url(None)).await?;
//! let rows = store
//!     .execute(sqlx::query("DELETE FROM playlists WHERE id = ?").bind(7))
//!     .await?;
//! store.close().await;
//! ```

pub mod schema;

use std::path::Path;
use std::str::FromStr;

use sqlx::{Execute, FromRow};
use sqlx::query::{Query, QueryAs};
use sqlx::sqlite::{
    Sqlite, SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use tracing::{debug, info};

/// Default database filename.
pub const DEFAULT_DB_NAME: &str = "tunebot.db";

/// A mutating statement with its bound parameters.
pub type StoreQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// A row-returning statement with its bound parameters.
pub type StoreQueryAs<'q, T> = QueryAs<'q, Sqlite, T, SqliteArguments<'q>>;

/// Build a SQLite database URL from an optional path.
///
/// If no path is provided, uses [`DEFAULT_DB_NAME`] in the current directory.
pub fn db_url(path: Option<&Path>) -> String {
    match path {
        Some(p) => format!("sqlite:{}", p.display()),
        None => format!("sqlite:{}", DEFAULT_DB_NAME),
    }
}

/// Storage-layer failures.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database connection is not open")]
    Closed,

    #[error("Failed to create schema: {0}")]
    Schema(#[source] sqlx::Error),

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl StorageError {
    /// True when the statement failed on a UNIQUE constraint.
    ///
    /// Check-then-insert sequences use this to treat a lost race as a
    /// duplicate rather than a failure.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Sqlx(sqlx::Error::Database(db)) => db.is_unique_violation(),
            _ => false,
        }
    }
}

/// Embedded database handle.
///
/// Cloning is cheap and every clone shares the same connection.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open the database and make sure every table exists.
    ///
    /// Creates the database file if it doesn't exist. The pool is capped at
    /// one connection with foreign keys enabled, so statements from
    /// concurrent commands are serialized by the driver.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the connection cannot be
    /// established, or schema creation fails. In the last case the
    /// connection is closed before returning.
    pub async fn open(db_url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(db_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        if let Err(e) = ensure_schema(&pool).await {
            pool.close().await;
            return Err(e);
        }

        info!(target: "tunebot::db", url = %db_url, "Database connection established");
        Ok(Self { pool })
    }

    /// Close the connection. Later calls on any clone fail with
    /// [`StorageError::Closed`]. Closing twice is harmless.
    pub async fn close(&self) {
        if !self.pool.is_closed() {
            self.pool.close().await;
            info!(target: "tunebot::db", "Database connection closed");
        }
    }

    /// Whether [`Store::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Run a mutating statement and return the number of rows it changed.
    pub async fn execute(&self, query: StoreQuery<'_>) -> Result<u64, StorageError> {
        self.ensure_open()?;
        debug!(target: "tunebot::db", sql = query.sql(), "execute");
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Fetch at most one row. Returns `None` when nothing matches.
    pub async fn fetch_one<T>(&self, query: StoreQueryAs<'_, T>) -> Result<Option<T>, StorageError>
    where
        T: Send + Unpin + for<'r> FromRow<'r, SqliteRow>,
    {
        self.ensure_open()?;
        debug!(target: "tunebot::db", "fetch_one");
        Ok(query.fetch_optional(&self.pool).await?)
    }

    /// Fetch every matching row in statement order.
    pub async fn fetch_all<T>(&self, query: StoreQueryAs<'_, T>) -> Result<Vec<T>, StorageError>
    where
        T: Send + Unpin + for<'r> FromRow<'r, SqliteRow>,
    {
        self.ensure_open()?;
        debug!(target: "tunebot::db", "fetch_all");
        Ok(query.fetch_all(&self.pool).await?)
    }

    fn ensure_open(&self) -> Result<(), StorageError> {
        if self.pool.is_closed() {
            return Err(StorageError::Closed);
        }
        Ok(())
    }
}

async fn ensure_schema(pool: &SqlitePool) -> Result<(), StorageError> {
    for &statement in schema::STATEMENTS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(StorageError::Schema)?;
    }
    debug!(target: "tunebot::db", tables = 4, "Schema verified");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::temp_store;

    #[test]
    fn test_db_url() {
        assert_eq!(db_url(None), "sqlite:tunebot.db");
        assert_eq!(
            db_url(Some(Path::new("/tmp/bot.db"))),
            "sqlite:/tmp/bot.db"
        );
    }

    #[tokio::test]
    async fn test_open_creates_database_and_tables() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let store = Store::open(&db_url(Some(&db_path)))
            .await
            .expect("Failed to open store");
        assert!(db_path.exists());

        let tables: Vec<(String,)> = store
            .fetch_all(sqlx::query_as(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            ))
            .await
            .unwrap();
        let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["liked_tracks", "playlist_tracks", "playlists", "users"]
        );
    }

    #[tokio::test]
    async fn test_open_is_idempotent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let url = db_url(Some(&temp_dir.path().join("test.db")));

        let first = Store::open(&url).await.unwrap();
        first
            .execute(sqlx::query("INSERT INTO users (telegram_id, username) VALUES (?, ?)").bind(1_i64).bind("a"))
            .await
            .unwrap();
        first.close().await;

        let second = Store::open(&url).await.unwrap();
        let count: Option<(i64,)> = second
            .fetch_one(sqlx::query_as("SELECT COUNT(*) FROM users"))
            .await
            .unwrap();
        assert_eq!(count, Some((1,)));
    }

    #[tokio::test]
    async fn test_execute_reports_rows_affected() {
        let (store, _dir) = temp_store().await;

        let inserted = store
            .execute(sqlx::query("INSERT INTO playlists (user_id, name) VALUES (?, ?)").bind(1_i64).bind("A"))
            .await
            .unwrap();
        assert_eq!(inserted, 1);

        let updated = store
            .execute(sqlx::query("UPDATE playlists SET name = 'B' WHERE name = 'missing'"))
            .await
            .unwrap();
        assert_eq!(updated, 0);
    }

    #[tokio::test]
    async fn test_fetch_one_returns_none_when_no_row() {
        let (store, _dir) = temp_store().await;
        let row: Option<(i64,)> = store
            .fetch_one(sqlx::query_as("SELECT id FROM users WHERE telegram_id = ?").bind(99_i64))
            .await
            .unwrap();
        assert!(row.is_none());
    }

    #[tokio::test]
    async fn test_unique_violation_is_detected() {
        let (store, _dir) = temp_store().await;
        let insert = || {
            sqlx::query("INSERT INTO users (telegram_id, username) VALUES (?, ?)")
                .bind(5_i64)
                .bind("dup")
        };

        store.execute(insert()).await.unwrap();
        let err = store.execute(insert()).await.unwrap_err();
        assert!(err.is_unique_violation());
        assert!(!StorageError::Closed.is_unique_violation());
    }

    #[tokio::test]
    async fn test_closed_store_rejects_statements() {
        let (store, _dir) = temp_store().await;
        let clone = store.clone();
        store.close().await;
        store.close().await;

        assert!(clone.is_closed());
        let err = clone
            .execute(sqlx::query("DELETE FROM users"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Closed));

        let err = clone
            .fetch_all::<(i64,)>(sqlx::query_as("SELECT id FROM users"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Closed));
    }

    #[tokio::test]
    async fn test_playlist_delete_cascades_at_schema_level() {
        let (store, _dir) = temp_store().await;
        store
            .execute(sqlx::query("INSERT INTO playlists (id, user_id, name) VALUES (1, 1, 'P')"))
            .await
            .unwrap();
        store
            .execute(sqlx::query("INSERT INTO playlist_tracks (playlist_id, track_id) VALUES (1, 't1')"))
            .await
            .unwrap();

        store
            .execute(sqlx::query("DELETE FROM playlists WHERE id = 1"))
            .await
            .unwrap();

        let left: Option<(i64,)> = store
            .fetch_one(sqlx::query_as("SELECT COUNT(*) FROM playlist_tracks"))
            .await
            .unwrap();
        assert_eq!(left, Some((0,)));
    }
}
