use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AuthResult, AuthenticationError};
use crate::helpers::time::{add_seconds, now};

/// Whether a token may be written to the cache after an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Provider said nothing, the engine's default policy applies.
    #[default]
    Default,
    Allow,
    Deny,
}

impl CachePolicy {
    /// Policy derived from a `Cache-Control` response header value.
    pub fn from_cache_control(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.split(',').any(|d| d.trim().eq_ignore_ascii_case("no-store")) => CachePolicy::Deny,
            _ => CachePolicy::Default,
        }
    }

    pub fn permits_caching(&self) -> bool {
        !matches!(self, CachePolicy::Deny)
    }

    fn is_default(&self) -> bool {
        matches!(self, CachePolicy::Default)
    }
}

/// Access token issued by the provider.
///
/// `token_type` and `access_token` are fixed at construction. The expiry pair
/// (`expiration`, `expires_at`) is derived from `expires_in` relative to the
/// construction time, except when a cached representation already carries an
/// absolute `expires_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredAccessToken")]
pub struct AccessToken {
    token_type: String,
    access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_in: Option<u64>,
    #[serde(skip)]
    expiration: Option<Duration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(skip_serializing_if = "CachePolicy::is_default")]
    cache_policy: CachePolicy,
}

impl AccessToken {
    pub fn new(
        token_type: impl Into<String>,
        access_token: impl Into<String>,
        expires_in: Option<u64>,
    ) -> AuthResult<Self> {
        let token_type = token_type.into();
        let access_token = access_token.into();
        if token_type.trim().is_empty() {
            return Err(AuthenticationError::invalid_argument("token_type", "cannot be empty or whitespace"));
        }
        if access_token.trim().is_empty() {
            return Err(AuthenticationError::invalid_argument("access_token", "cannot be empty or whitespace"));
        }

        let issued_at = now();
        Ok(Self {
            token_type,
            access_token,
            expires_in,
            expiration: expires_in.map(Duration::from_secs),
            expires_at: expires_in.map(|secs| add_seconds(issued_at, secs)),
            scope: None,
            refresh_token: None,
            cache_policy: CachePolicy::Default,
        })
    }

    pub fn with_scope(mut self, scope: Option<String>) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_refresh_token(mut self, refresh_token: Option<String>) -> Self {
        self.refresh_token = refresh_token;
        self
    }

    pub fn with_cache_policy(mut self, cache_policy: CachePolicy) -> Self {
        self.cache_policy = cache_policy;
        self
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn expires_in(&self) -> Option<u64> {
        self.expires_in
    }

    pub fn expiration(&self) -> Option<Duration> {
        self.expiration
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn cache_policy(&self) -> CachePolicy {
        self.cache_policy
    }

    /// Value for an outbound `Authorization` header, e.g. `Bearer abc`.
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }

    /// Tokens without a known expiry never report as expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| now() >= at)
    }
}

/// Persisted shape used by cache backends.
#[derive(Deserialize)]
struct StoredAccessToken {
    token_type: String,
    access_token: String,
    expires_in: Option<u64>,
    expires_at: Option<DateTime<Utc>>,
    scope: Option<String>,
    refresh_token: Option<String>,
    #[serde(default)]
    cache_policy: CachePolicy,
}

impl TryFrom<StoredAccessToken> for AccessToken {
    type Error = AuthenticationError;

    fn try_from(stored: StoredAccessToken) -> AuthResult<Self> {
        let mut token = AccessToken::new(stored.token_type, stored.access_token, stored.expires_in)?
            .with_scope(stored.scope)
            .with_refresh_token(stored.refresh_token)
            .with_cache_policy(stored.cache_policy);
        // the stored absolute expiry wins over the one recomputed just now
        if stored.expires_at.is_some() {
            token.expires_at = stored.expires_at;
        }
        Ok(token)
    }
}
