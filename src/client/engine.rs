use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use crate::cache::TokenCache;
use crate::client::body::build_token_request_body;
use crate::config::ClientOptions;
use crate::error::{AuthResult, AuthenticationError};
use crate::grants::{build_authorization_url, AuthenticationCodeInfo, GrantRequest};
use crate::helpers::time::get_instant;
use crate::observability::metrics::{Metrics, CACHE_HIT, CACHE_MISS};
use crate::parser::parse_token_response;
use crate::token::AccessToken;

/// Acquires access tokens from the token endpoint, cache-aside.
///
/// Holds no mutable state of its own. Concurrent `acquire` calls for the same
/// token name may both miss the cache and both hit the provider; the last
/// cache write wins.
#[derive(Clone)]
pub struct AuthenticationEngine {
    client: Client,
    options: Arc<ClientOptions>,
    cache: Option<Arc<dyn TokenCache>>,
    metrics: Option<Arc<Metrics>>,
}

impl AuthenticationEngine {
    pub fn new(client: Client, options: ClientOptions) -> Self {
        Self { client, options: Arc::new(options), cache: None, metrics: None }
    }

    pub fn with_cache(mut self, cache: Arc<dyn TokenCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn has_cache(&self) -> bool {
        self.cache.is_some()
    }

    pub fn metrics(&self) -> Option<&Arc<Metrics>> {
        self.metrics.as_ref()
    }

    /// Return a cached token for the request's token name, or run the grant
    /// against the provider and cache the result.
    ///
    /// Cached tokens are returned as-is; expiry is the cache's business.
    pub async fn acquire(&self, request: &GrantRequest, cancel: &CancellationToken) -> AuthResult<AccessToken> {
        let grant_type = request.grant_type().as_str();
        if let Some(metrics) = &self.metrics {
            metrics.token_requests.with_label_values(&[grant_type]).inc();
        }

        let result = self.acquire_with_cache(request, cancel).await;
        if let Err(err) = &result {
            warn!(grant_type, reason = err.reason(), "token acquisition failed: {}", err);
            if let Some(metrics) = &self.metrics {
                metrics.token_failures.with_label_values(&[grant_type, err.reason()]).inc();
            }
        }
        result
    }

    /// Drop the token cached under `token_name`. `false` when nothing was stored
    /// or no cache is configured.
    pub async fn evict(&self, token_name: &str, cancel: &CancellationToken) -> AuthResult<bool> {
        let Some(cache) = &self.cache else {
            return Ok(false);
        };
        if token_name.trim().is_empty() {
            return Ok(false);
        }
        let removed = cache.remove(token_name, cancel).await.map_err(AuthenticationError::Cache)?;
        debug!(token_name, removed, "token evicted from cache");
        Ok(removed)
    }

    /// Redirect URL for the authorization-code flow against `authorize_url`.
    pub fn authorization_url(&self, info: &AuthenticationCodeInfo) -> AuthResult<Url> {
        let authorize_url = self
            .options
            .authorize_url
            .as_deref()
            .ok_or_else(|| AuthenticationError::invalid_argument("authorize_url", "not configured"))?;
        build_authorization_url(info, authorize_url)
    }

    async fn acquire_with_cache(&self, request: &GrantRequest, cancel: &CancellationToken) -> AuthResult<AccessToken> {
        let token_name = request.token_name();

        if let Some(token) = self.get_from_cache(token_name, cancel).await? {
            return Ok(token);
        }

        let token = self.request_token(request, cancel).await?;
        self.set_in_cache(token_name, &token, cancel).await?;
        Ok(token)
    }

    async fn get_from_cache(
        &self,
        token_name: Option<&str>,
        cancel: &CancellationToken,
    ) -> AuthResult<Option<AccessToken>> {
        let (Some(name), Some(cache)) = (token_name, &self.cache) else {
            return Ok(None);
        };

        let cached = cache.get(name, cancel).await.map_err(AuthenticationError::Cache)?;
        let label = if cached.is_some() { CACHE_HIT } else { CACHE_MISS };
        debug!(token_name = name, "token cache {}", label);
        if let Some(metrics) = &self.metrics {
            metrics.cache_lookups.with_label_values(&[label]).inc();
        }
        Ok(cached)
    }

    async fn set_in_cache(
        &self,
        token_name: Option<&str>,
        token: &AccessToken,
        cancel: &CancellationToken,
    ) -> AuthResult<()> {
        let (Some(name), Some(cache)) = (token_name, &self.cache) else {
            return Ok(());
        };
        if !token.cache_policy().permits_caching() {
            debug!(token_name = name, "provider forbids caching the token");
            return Ok(());
        }

        let ttl = token
            .expiration()
            .unwrap_or_else(|| Duration::from_secs(self.options.default_token_expiration));
        cache.set(name, token, ttl, cancel).await.map_err(AuthenticationError::Cache)?;
        debug!(token_name = name, ttl_seconds = ttl.as_secs(), "token cached");
        if let Some(metrics) = &self.metrics {
            metrics.cache_writes.inc();
        }
        Ok(())
    }

    async fn request_token(&self, request: &GrantRequest, cancel: &CancellationToken) -> AuthResult<AccessToken> {
        let grant_type = request.grant_type().as_str();
        let body = build_token_request_body(request)?;

        let start = get_instant();
        let result = self.exchange(&body, cancel).await;
        if let Some(metrics) = &self.metrics {
            metrics
                .exchange_duration
                .with_label_values(&[grant_type])
                .observe(start.elapsed().as_secs_f64());
        }

        let token = result?;
        info!(
            grant_type,
            token_type = token.token_type(),
            expires_in = token.expires_in(),
            "access token issued by provider"
        );
        Ok(token)
    }

    async fn exchange(&self, body: &Value, cancel: &CancellationToken) -> AuthResult<AccessToken> {
        let send = self.client.post(&self.options.token_url).json(body).send();
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AuthenticationError::Cancelled),
            response = send => response.map_err(AuthenticationError::unknown)?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(AuthenticationError::provider_status(status));
        }

        let headers = response.headers().clone();
        let text = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AuthenticationError::Cancelled),
            text = response.text() => text.map_err(AuthenticationError::unknown)?,
        };
        parse_token_response(&headers, &text)
    }
}
