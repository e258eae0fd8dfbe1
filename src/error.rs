//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while the
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - [`StorageError`](crate::db::StorageError): connection and constraint failures
//! - [`CatalogError`](crate::catalog::CatalogError): remote catalog failures
//!
//! "Not found" and "already exists" are ordinary return values of the
//! domain operations and never show up here.
//!
//! # Example
//!
//! ```ignore
//! use tunebot::error::{Error, Result, ResultExt};
//!
//! async fn welcome(store: &Store, id: i64) -> Result<()> {
//!     library::register_user(store, id, None)
//!         .await
//!         .with_context("while registering user")?;
//!     Ok(())
//! }
//! ```

use crate::catalog::CatalogError;
use crate::db::StorageError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Remote catalog error
    #[error("Catalog error: {0}")]
    RemoteApi(#[from] CatalogError),

    /// Malformed command arguments; the message is shown to the user as-is
    #[error("{0}")]
    Validation(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any context wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Self::WithContext { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        Self::Storage(StorageError::from(e))
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, StorageError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Storage(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, CatalogError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::RemoteApi(e).context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_is_bare_message() {
        let err = Error::validation("Usage: /like <track_id>");
        assert_eq!(err.to_string(), "Usage: /like <track_id>");
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::validation("missing track id").context("while liking a track");
        let msg = err.to_string();
        assert!(msg.contains("while liking a track"));
        assert!(msg.contains("missing track id"));
    }

    #[test]
    fn test_root_skips_context() {
        let err = Error::validation("bad").context("outer").context("outermost");
        assert!(matches!(err.root(), Error::Validation(m) if m == "bad"));
    }

    #[test]
    fn test_result_ext_on_storage_error() {
        let result: std::result::Result<(), StorageError> = Err(StorageError::Closed);
        let err = result.with_context("liking track").unwrap_err();
        assert!(err.to_string().contains("liking track"));
        assert!(matches!(err.root(), Error::Storage(StorageError::Closed)));
    }

    #[test]
    fn test_result_ext_on_catalog_error() {
        let result: std::result::Result<(), CatalogError> = Err(CatalogError::MissingCredentials);
        let err = result.with_context("searching").unwrap_err();
        assert!(matches!(err.root(), Error::RemoteApi(_)));
    }
}
