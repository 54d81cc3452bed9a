//! OAuth access token cache.
//!
//! Tokens are refreshed a minute before they expire. Refresh runs under the
//! write lock so concurrent callers wait for a single refresh. If a refresh
//! fails while the old token is still inside its lifetime, the old token is
//! returned.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use gcp_auth::TokenProvider;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{FirestoreError, FirestoreResult};

const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Lifetime assumed when the provider reports an unusable expiry.
const FALLBACK_TTL: Duration = Duration::from_secs(50 * 60);

/// OAuth scope for the Firestore REST API.
pub const FIRESTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self, now: Instant) -> bool {
        now + REFRESH_MARGIN < self.expires_at
    }

    fn is_alive(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Shared access token cache.
pub struct TokenCache {
    provider: Arc<dyn TokenProvider>,
    cached: RwLock<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new(provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            provider,
            cached: RwLock::new(None),
        }
    }

    /// Drop the cached token, forcing a refresh on the next call.
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
    }

    /// Return a token with at least the refresh margin left.
    pub async fn get_token(&self) -> FirestoreResult<String> {
        if let Some(token) = self.cached.read().await.as_ref() {
            if token.is_fresh(Instant::now()) {
                return Ok(token.value.clone());
            }
        }

        let mut cached = self.cached.write().await;
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Instant::now()) {
                return Ok(token.value.clone());
            }
        }

        match self.provider.token(&[FIRESTORE_SCOPE]).await {
            Ok(token) => {
                let ttl = remaining_lifetime(token.expires_at());
                let value = token.as_str().to_string();
                *cached = Some(CachedToken {
                    value: value.clone(),
                    expires_at: Instant::now() + ttl,
                });
                debug!(ttl_secs = ttl.as_secs(), "Refreshed Firestore access token");
                Ok(value)
            }
            Err(e) => match cached.as_ref() {
                Some(token) if token.is_alive(Instant::now()) => {
                    warn!(error = %e, "Token refresh failed, reusing current token");
                    Ok(token.value.clone())
                }
                _ => Err(FirestoreError::auth_error(format!(
                    "Failed to obtain access token: {}",
                    e
                ))),
            },
        }
    }
}

/// Time left until `expires_at`. Zero for expired tokens so the next call
/// refreshes again.
fn remaining_lifetime(expires_at: chrono::DateTime<Utc>) -> Duration {
    let now = Utc::now();
    if expires_at <= now {
        return Duration::ZERO;
    }
    (expires_at - now).to_std().unwrap_or(FALLBACK_TTL)
}
