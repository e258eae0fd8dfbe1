//! Test utilities and fixtures for tunebot tests.
//!
//! This module provides common test helpers to reduce boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use tunebot::test_utils::{temp_store, mock_sender};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let (store, _dir) = temp_store().await;
//!     let sender = mock_sender(42);
//!     // ... test logic
//! }
//! ```

use tempfile::TempDir;

use crate::bot::{Sender, Update};
use crate::db::Store;
use crate::model::UserId;

/// Creates a temporary database for testing.
///
/// The database lives in a temporary directory that is removed when the
/// returned `TempDir` is dropped. Keep it alive for the whole test.
///
/// ```ignore
/// let (store, _dir) = temp_store().await;
/// ```
pub async fn temp_store() -> (Store, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db");
    let db_url = format!("sqlite:{}", db_path.display());

    let store = Store::open(&db_url)
        .await
        .expect("Failed to initialize test database");

    (store, dir)
}

/// Count rows in a table.
pub async fn count_rows(store: &Store, table: &str) -> i64 {
    let sql = format!("SELECT COUNT(*) FROM {table}");
    let row: Option<(i64,)> = store
        .fetch_one(sqlx::query_as(&sql))
        .await
        .expect("Failed to count rows");
    row.map(|(n,)| n).unwrap_or(0)
}

/// A message sender with predictable names.
pub fn mock_sender(id: UserId) -> Sender {
    Sender {
        id,
        username: Some(format!("user{id}")),
        first_name: format!("Tester{id}"),
    }
}

/// A text message from `id`.
pub fn message(id: UserId, text: &str) -> Update {
    Update::Message {
        sender: mock_sender(id),
        text: text.to_string(),
    }
}

/// A button press from `id`.
pub fn callback(id: UserId, data: &str) -> Update {
    Update::Callback {
        sender: mock_sender(id),
        data: data.to_string(),
    }
}
