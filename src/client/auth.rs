//! OAuth2 client-credentials token cache.

use std::time::{Duration, Instant};

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::Mutex;

/// Tokens are refreshed this long before PayPal says they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Upper bound on a cached token's lifetime, whatever `expires_in` says.
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(86_400);

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: String,
    pub(crate) expires_in: u64,
}

#[derive(Debug)]
struct AccessToken {
    value: SecretString,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self, now: Instant) -> bool {
        now + EXPIRY_MARGIN < self.expires_at
    }
}

/// Holds at most one access token.
///
/// The mutex is held while a token is fetched, so concurrent operations wait for
/// one refresh instead of each authenticating.
#[derive(Debug, Default)]
pub(crate) struct TokenCache {
    inner: Mutex<Option<AccessToken>>,
}

impl TokenCache {
    /// Returns the cached token or obtains a new one through `fetch`.
    pub(crate) async fn get_or_fetch<F, Fut, E>(&self, fetch: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TokenResponse, E>>,
    {
        let mut guard = self.inner.lock().await;
        let now = Instant::now();
        if let Some(token) = guard.as_ref()
            && token.is_fresh(now)
        {
            return Ok(token.value.expose_secret().to_owned());
        }

        tracing::debug!("Requesting PayPal access token");
        let response = fetch().await?;
        let value = response.access_token.clone();
        *guard = Some(AccessToken {
            value: SecretString::from(response.access_token),
            expires_at: expires_at(now, response.expires_in),
        });
        Ok(value)
    }

    /// Drops the cached token so the next call authenticates again.
    pub(crate) async fn invalidate(&self) {
        *self.inner.lock().await = None;
    }
}

fn expires_at(now: Instant, expires_in: u64) -> Instant {
    let lifetime = Duration::from_secs(expires_in).min(MAX_TOKEN_LIFETIME);
    now.checked_add(lifetime).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn response(token: &str, expires_in: u64) -> TokenResponse {
        TokenResponse { access_token: token.to_owned(), expires_in }
    }

    #[tokio::test]
    async fn test_token_is_reused_while_fresh() {
        let cache = TokenCache::default();
        let calls = AtomicU32::new(0);

        for _ in 0..3 {
            let token = cache
                .get_or_fetch(|| async {
                    calls.fetch_add(1, Ordering::Relaxed);
                    Ok::<_, ()>(response("t1", 3600))
                })
                .await
                .unwrap();
            assert_eq!(token, "t1");
        }

        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_short_lived_token_is_refetched() {
        let cache = TokenCache::default();
        let first = cache.get_or_fetch(|| async { Ok::<_, ()>(response("t1", 30)) }).await;
        assert_eq!(first.unwrap(), "t1");

        // 30s is inside the refresh margin, so the next call fetches again.
        let second = cache.get_or_fetch(|| async { Ok::<_, ()>(response("t2", 3600)) }).await;
        assert_eq!(second.unwrap(), "t2");
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let cache = TokenCache::default();
        let _ = cache.get_or_fetch(|| async { Ok::<_, ()>(response("t1", 3600)) }).await;
        cache.invalidate().await;
        let token = cache.get_or_fetch(|| async { Ok::<_, ()>(response("t2", 3600)) }).await;
        assert_eq!(token.unwrap(), "t2");
    }

    #[tokio::test]
    async fn test_fetch_error_is_not_cached() {
        let cache = TokenCache::default();
        let err = cache.get_or_fetch(|| async { Err::<TokenResponse, _>("boom") }).await;
        assert_eq!(err.unwrap_err(), "boom");
        let token = cache.get_or_fetch(|| async { Ok::<_, &str>(response("t1", 3600)) }).await;
        assert_eq!(token.unwrap(), "t1");
    }

    #[tokio::test]
    async fn test_huge_expires_in_is_clamped() {
        let cache = TokenCache::default();
        let token = cache.get_or_fetch(|| async { Ok::<_, ()>(response("t1", u64::MAX)) }).await;
        assert_eq!(token.unwrap(), "t1");

        let reused = cache.get_or_fetch(|| async { Ok::<_, ()>(response("t2", 3600)) }).await;
        assert_eq!(reused.unwrap(), "t1");
    }

    #[test]
    fn test_expiry_never_exceeds_max_lifetime() {
        let now = Instant::now();
        assert_eq!(expires_at(now, u64::MAX), now + MAX_TOKEN_LIFETIME);
        assert_eq!(expires_at(now, 120), now + Duration::from_secs(120));
    }
}
