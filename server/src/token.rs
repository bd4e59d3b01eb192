//! In-memory bearer token cache with explicit expiry.
//!
//! The Notehub OAuth2 endpoint returns an `access_token` together with an
//! `expires_in` lifetime. [`TokenCache`] stores the token alongside the
//! instant it was issued and the instant it expires, and only hands it out
//! while more than the refresh margin of its lifetime remains. Once a token
//! is inside the margin the cache reports a miss and the client fetches a
//! new one before the old token actually lapses.
//!
//! Lifetimes are capped at [`MAX_TOKEN_TTL`]. For tokens that live no longer
//! than twice the margin, half the lifetime is used as the margin instead.
//!
//! # Thread Safety
//!
//! The cache uses a [`RwLock`] around a single slot. Locks are never held
//! across an `.await`; callers read, release, fetch, then store.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use trackflow_server::token::{CachedToken, TokenCache};
//!
//! let cache = TokenCache::new();
//! assert!(cache.get().is_none());
//!
//! cache.store(CachedToken::new("abc".to_string(), Duration::from_secs(1800)));
//! assert_eq!(cache.get().as_deref(), Some("abc"));
//! ```

use std::fmt;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

/// Lifetime assumed when the authorization response omits `expires_in`.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(1800);

/// A token is refreshed once less than this much lifetime remains.
pub const DEFAULT_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Longest lifetime a cached token is trusted for.
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// A bearer token plus the window during which it is valid.
#[derive(Clone)]
pub struct CachedToken {
    access_token: String,
    issued_at: Instant,
    lifetime: Duration,
    expires_at: Instant,
}

impl CachedToken {
    /// Creates a token issued now that expires after `ttl`, capped at
    /// [`MAX_TOKEN_TTL`].
    pub fn new(access_token: String, ttl: Duration) -> Self {
        let issued_at = Instant::now();
        let lifetime = ttl.min(MAX_TOKEN_TTL);
        let expires_at = issued_at.checked_add(lifetime).unwrap_or(issued_at);
        Self {
            access_token,
            issued_at,
            lifetime,
            expires_at,
        }
    }

    /// The opaque bearer string.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// How long ago the token was issued.
    pub fn age(&self) -> Duration {
        self.issued_at.elapsed()
    }

    /// Returns the remaining time until expiration, or zero if expired.
    pub fn remaining_ttl(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    /// Lifetime the token was cached with.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Returns true if at `now` more than the effective margin remains.
    ///
    /// The margin never exceeds half the token's lifetime.
    fn is_fresh_at(&self, now: Instant, margin: Duration) -> bool {
        let margin = margin.min(self.lifetime / 2);
        now.checked_add(margin)
            .is_some_and(|deadline| deadline < self.expires_at)
    }
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("access_token", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .field("lifetime", &self.lifetime)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Process-wide holder for the current bearer token.
pub struct TokenCache {
    slot: RwLock<Option<CachedToken>>,
    refresh_margin: Duration,
}

impl TokenCache {
    /// Creates an empty cache with the default refresh margin.
    pub fn new() -> Self {
        Self::with_refresh_margin(DEFAULT_REFRESH_MARGIN)
    }

    /// Creates an empty cache with a custom refresh margin.
    pub fn with_refresh_margin(refresh_margin: Duration) -> Self {
        Self {
            slot: RwLock::new(None),
            refresh_margin,
        }
    }

    /// Margin before expiry at which tokens are refreshed.
    pub fn refresh_margin(&self) -> Duration {
        self.refresh_margin
    }

    /// Returns the cached token if it is still fresh.
    pub fn get(&self) -> Option<String> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            Some(token) if token.is_fresh_at(Instant::now(), self.refresh_margin) => {
                trace!(
                    remaining_secs = token.remaining_ttl().as_secs(),
                    "Using cached bearer token"
                );
                Some(token.access_token.clone())
            }
            Some(token) => {
                debug!(
                    age_secs = token.age().as_secs(),
                    remaining_secs = token.remaining_ttl().as_secs(),
                    "Cached bearer token is due for refresh"
                );
                None
            }
            None => None,
        }
    }

    /// Replaces the cached token.
    pub fn store(&self, token: CachedToken) {
        debug!(
            ttl_secs = token.remaining_ttl().as_secs(),
            "Caching bearer token"
        );
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(token);
    }

    /// Drops the cached token so the next request re-authenticates.
    pub fn invalidate(&self) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if slot.take().is_some() {
            debug!("Invalidated cached bearer token");
        }
    }

    /// Returns true if a fresh token is cached.
    pub fn has_fresh_token(&self) -> bool {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref()
            .is_some_and(|token| token.is_fresh_at(Instant::now(), self.refresh_margin))
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCache")
            .field("has_fresh_token", &self.has_fresh_token())
            .field("refresh_margin", &self.refresh_margin)
            .finish()
    }
}
