//! # Authentication
//!
//! Bearer-token authenticator seam and a caching wrapper that refreshes
//! tokens shortly before they expire.

use crate::domain::errors::HarnessResult;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Tokens are refreshed this long before their stated expiry.
const REFRESH_BUFFER_SECONDS: i64 = 60;

/// A bearer token with its expiry instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl BearerToken {
    /// Creates a token.
    #[must_use]
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Returns the token value.
    #[inline]
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the expiry instant.
    #[inline]
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns true if the token expires within the given buffer.
    #[must_use]
    pub fn expires_within(&self, buffer: Duration) -> bool {
        Utc::now() + buffer >= self.expires_at
    }
}

/// Seam producing bearer tokens for the query-API channel.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Acquires a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::TransportFailure` if the token endpoint
    /// could not be reached or rejected the request.
    async fn bearer_token(&self) -> HarnessResult<BearerToken>;
}

/// Caching wrapper over an [`Authenticator`].
///
/// Acquired tokens are reused until one minute before expiry, then
/// refreshed on the next request. [`TokenCache::invalidate`] forces a
/// refresh on the next access.
pub struct TokenCache {
    inner: Arc<dyn Authenticator>,
    refresh_buffer: Duration,
    cached: RwLock<Option<BearerToken>>,
}

impl TokenCache {
    /// Wraps an authenticator with the default one-minute refresh buffer.
    #[must_use]
    pub fn new(inner: Arc<dyn Authenticator>) -> Self {
        Self {
            inner,
            refresh_buffer: Duration::seconds(REFRESH_BUFFER_SECONDS),
            cached: RwLock::new(None),
        }
    }

    /// Sets the refresh buffer.
    #[must_use]
    pub fn with_refresh_buffer(mut self, buffer: Duration) -> Self {
        self.refresh_buffer = buffer;
        self
    }

    /// Drops the cached token, forcing a refresh on the next access.
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
        info!("Cached bearer token invalidated");
    }
}

#[async_trait]
impl Authenticator for TokenCache {
    async fn bearer_token(&self) -> HarnessResult<BearerToken> {
        if let Some(token) = self.cached.read().await.as_ref()
            && !token.expires_within(self.refresh_buffer)
        {
            debug!("Reusing cached bearer token");
            return Ok(token.clone());
        }

        let mut cached = self.cached.write().await;
        // Another task may have refreshed while this one waited for the
        // write lock.
        if let Some(token) = cached.as_ref()
            && !token.expires_within(self.refresh_buffer)
        {
            return Ok(token.clone());
        }

        let token = self.inner.bearer_token().await?;
        info!(expires_at = %token.expires_at(), "Bearer token acquired");
        *cached = Some(token.clone());
        Ok(token)
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("refresh_buffer", &self.refresh_buffer)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct CountingAuthenticator {
        calls: AtomicU64,
        lifetime: Duration,
    }

    impl CountingAuthenticator {
        fn new(lifetime: Duration) -> Self {
            Self {
                calls: AtomicU64::new(0),
                lifetime,
            }
        }

        fn calls(&self) -> u64 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Authenticator for CountingAuthenticator {
        async fn bearer_token(&self) -> HarnessResult<BearerToken> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(BearerToken::new(
                format!("token-{}", n),
                Utc::now() + self.lifetime,
            ))
        }
    }

    #[tokio::test]
    async fn token_reused_while_fresh() {
        let inner = Arc::new(CountingAuthenticator::new(Duration::hours(1)));
        let cache = TokenCache::new(Arc::clone(&inner) as Arc<dyn Authenticator>);

        let first = cache.bearer_token().await.unwrap();
        let second = cache.bearer_token().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test]
    async fn near_expiry_token_refreshed() {
        // Lifetime shorter than the refresh buffer: every access refreshes.
        let inner = Arc::new(CountingAuthenticator::new(Duration::seconds(30)));
        let cache = TokenCache::new(Arc::clone(&inner) as Arc<dyn Authenticator>);

        let first = cache.bearer_token().await.unwrap();
        let second = cache.bearer_token().await.unwrap();

        assert_ne!(first.token(), second.token());
        assert_eq!(inner.calls(), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_refresh() {
        let inner = Arc::new(CountingAuthenticator::new(Duration::hours(1)));
        let cache = TokenCache::new(Arc::clone(&inner) as Arc<dyn Authenticator>);

        cache.bearer_token().await.unwrap();
        cache.invalidate().await;
        cache.bearer_token().await.unwrap();

        assert_eq!(inner.calls(), 2);
    }

    #[test]
    fn expires_within_checks_buffer() {
        let token = BearerToken::new("t", Utc::now() + Duration::seconds(30));
        assert!(token.expires_within(Duration::seconds(60)));
        assert!(!token.expires_within(Duration::seconds(5)));
    }
}
