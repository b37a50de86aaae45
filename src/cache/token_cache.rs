use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::BoxError;
use crate::token::AccessToken;

pub type CacheResult<T> = std::result::Result<T, BoxError>;

/// Storage for issued tokens, keyed by a caller-chosen token name.
///
/// The engine never checks expiry of a returned token: implementations must
/// evict (or report a miss for) entries whose `ttl` has elapsed. Calls for
/// different names may run concurrently; ordering for the same name is up to
/// the implementation.
#[async_trait]
pub trait TokenCache: Send + Sync {
    async fn get(&self, name: &str, cancel: &CancellationToken) -> CacheResult<Option<AccessToken>>;

    async fn set(
        &self,
        name: &str,
        token: &AccessToken,
        ttl: Duration,
        cancel: &CancellationToken,
    ) -> CacheResult<()>;

    /// Returns `true` when a token was stored under `name`.
    async fn remove(&self, name: &str, cancel: &CancellationToken) -> CacheResult<bool>;
}
