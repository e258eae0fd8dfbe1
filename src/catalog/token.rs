//! Bearer token cache.
//!
//! Holds at most one token and the instant it stops being usable. The slot
//! is a plain mutex that is never held across an `.await`, so two tasks
//! that miss at the same time both fetch and the last write wins.

use std::future::Future;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, warn};

/// Tokens this close to expiry are treated as expired.
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Time-bounded cache for a single access token.
#[derive(Debug)]
pub struct TokenCache {
    ttl: Duration,
    slot: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    /// Create an empty cache whose entries live at most `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// The cached token, if present and not expired.
    pub fn get(&self) -> Option<String> {
        let slot = self.slot.lock();
        slot.as_ref()
            .filter(|t| Instant::now() < t.expires_at)
            .map(|t| t.value.clone())
    }

    /// Store a token. `lifetime` from the server shortens the configured TTL.
    ///
    /// A TTL too large to represent as an `Instant` leaves the cache empty.
    pub fn store(&self, value: String, lifetime: Option<Duration>) {
        let mut ttl = lifetime.map_or(self.ttl, |l| l.min(self.ttl));
        if ttl > EXPIRY_MARGIN * 2 {
            ttl -= EXPIRY_MARGIN;
        }
        let Some(expires_at) = Instant::now().checked_add(ttl) else {
            warn!(target: "tunebot::catalog", ttl_secs = ttl.as_secs(), "Token TTL out of range, not caching");
            self.clear();
            return;
        };
        *self.slot.lock() = Some(CachedToken { value, expires_at });
    }

    /// Drop the cached token so the next call fetches a new one.
    pub fn clear(&self) {
        *self.slot.lock() = None;
    }

    /// Return the cached token or fetch, store, and return a new one.
    ///
    /// `fetch` yields the token and, optionally, the lifetime the server
    /// granted. Errors from `fetch` are returned unchanged and leave the
    /// cache empty.
    pub async fn get_or_refresh<F, Fut, E>(&self, fetch: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(String, Option<Duration>), E>>,
    {
        if let Some(token) = self.get() {
            return Ok(token);
        }

        debug!(target: "tunebot::catalog", "Access token missing or expired, refreshing");
        let (value, lifetime) = fetch().await?;
        self.store(value.clone(), lifetime);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn fetch_counted(
        calls: &AtomicUsize,
    ) -> Result<(String, Option<Duration>), std::convert::Infallible> {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok((format!("token-{n}"), None))
    }

    #[tokio::test]
    async fn test_fetches_once_within_ttl() {
        let cache = TokenCache::new(Duration::from_secs(3600));
        let calls = AtomicUsize::new(0);

        let first = cache.get_or_refresh(|| fetch_counted(&calls)).await.unwrap();
        let second = cache.get_or_refresh(|| fetch_counted(&calls)).await.unwrap();

        assert_eq!(first, "token-1");
        assert_eq!(second, "token-1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refetches_after_expiry() {
        let cache = TokenCache::new(Duration::ZERO);
        let calls = AtomicUsize::new(0);

        cache.get_or_refresh(|| fetch_counted(&calls)).await.unwrap();
        let second = cache.get_or_refresh(|| fetch_counted(&calls)).await.unwrap();

        assert_eq!(second, "token-2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_server_lifetime_shortens_ttl() {
        let cache = TokenCache::new(Duration::from_secs(3600));
        cache.store("short".to_string(), Some(Duration::ZERO));
        assert!(cache.get().is_none());

        cache.store("long".to_string(), Some(Duration::from_secs(7200)));
        assert_eq!(cache.get().as_deref(), Some("long"));
    }

    #[tokio::test]
    async fn test_fetch_error_leaves_cache_empty() {
        let cache = TokenCache::new(Duration::from_secs(3600));

        let result: Result<String, &str> = cache.get_or_refresh(|| async { Err("boom") }).await;
        assert_eq!(result, Err("boom"));
        assert!(cache.get().is_none());
    }

    #[tokio::test]
    async fn test_huge_ttl_is_not_cached() {
        let cache = TokenCache::new(Duration::from_secs(u64::MAX));
        let calls = AtomicUsize::new(0);

        let first = cache.get_or_refresh(|| fetch_counted(&calls)).await.unwrap();
        assert_eq!(first, "token-1");
        assert!(cache.get().is_none());

        cache.store("max".to_string(), Some(Duration::MAX));
        assert!(cache.get().is_none());

        // A server lifetime still bounds the huge configured TTL.
        cache.store("bounded".to_string(), Some(Duration::from_secs(3600)));
        assert_eq!(cache.get().as_deref(), Some("bounded"));
    }

    #[test]
    fn test_clear() {
        let cache = TokenCache::new(Duration::from_secs(3600));
        cache.store("abc".to_string(), None);
        assert!(cache.get().is_some());

        cache.clear();
        assert!(cache.get().is_none());
    }
}
