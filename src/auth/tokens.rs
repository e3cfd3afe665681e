//! Session tokens for external-auth mode.

use dashmap::DashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::observability::metrics;

/// Lifetime of a session token on the appliance.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(20 * 60);

/// Issues opaque tokens that stay valid for a fixed time from issuance.
///
/// Use does not extend a token's lifetime. Expired entries are purged on
/// every issue, keeping the map bounded by the tokens issued within one TTL.
#[derive(Debug)]
pub struct TokenCache {
    tokens: DashMap<String, Instant>,
    ttl: Duration,
}

impl TokenCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            tokens: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a new random token.
    pub fn issue(&self) -> String {
        self.issue_at(Instant::now())
    }

    /// Whether `token` was issued and has not expired.
    pub fn validate(&self, token: &str) -> bool {
        self.validate_at(token, Instant::now())
    }

    pub(crate) fn issue_at(&self, now: Instant) -> String {
        self.purge_expired(now);

        let token = Uuid::new_v4().to_string();
        self.tokens.insert(token.clone(), now);
        metrics::record_token_issued();
        token
    }

    pub(crate) fn validate_at(&self, token: &str, now: Instant) -> bool {
        self.tokens
            .get(token)
            .map(|issued| !self.is_expired(*issued, now))
            .unwrap_or(false)
    }

    fn is_expired(&self, issued: Instant, now: Instant) -> bool {
        now.saturating_duration_since(issued) >= self.ttl
    }

    fn purge_expired(&self, now: Instant) {
        self.tokens.retain(|_, issued| !self.is_expired(*issued, now));
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_TTL)
    }
}
