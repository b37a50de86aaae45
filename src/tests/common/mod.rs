// tests/common/mod.rs
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use httpmock::MockServer;
use reqwest::Client;
use tokio_util::sync::CancellationToken;

use crate::cache::{CacheResult, TokenCache};
use crate::client::AuthenticationEngine;
use crate::config::ClientOptions;
use crate::token::AccessToken;

pub const TOKEN_PATH: &str = "/oauth/token";

/// In-memory cache double that records every `set`.
#[derive(Default)]
pub struct RecordingCache {
    entries: Mutex<HashMap<String, AccessToken>>,
    sets: Mutex<Vec<(String, Duration)>>,
    failing: bool,
}

impl RecordingCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every call fails with an I/O error.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self { failing: true, ..Self::default() })
    }

    pub fn with_entry(name: &str, token: AccessToken) -> Arc<Self> {
        let cache = Self::default();
        cache.entries.lock().unwrap().insert(name.to_owned(), token);
        Arc::new(cache)
    }

    pub fn sets(&self) -> Vec<(String, Duration)> {
        self.sets.lock().unwrap().clone()
    }

    pub fn stored(&self, name: &str) -> Option<AccessToken> {
        self.entries.lock().unwrap().get(name).cloned()
    }

    fn check(&self) -> CacheResult<()> {
        if self.failing {
            return Err(Box::new(std::io::Error::new(std::io::ErrorKind::Other, "cache backend down")));
        }
        Ok(())
    }
}

#[async_trait]
impl TokenCache for RecordingCache {
    async fn get(&self, name: &str, _cancel: &CancellationToken) -> CacheResult<Option<AccessToken>> {
        self.check()?;
        Ok(self.entries.lock().unwrap().get(name).cloned())
    }

    async fn set(&self, name: &str, token: &AccessToken, ttl: Duration, _cancel: &CancellationToken) -> CacheResult<()> {
        self.check()?;
        self.sets.lock().unwrap().push((name.to_owned(), ttl));
        self.entries.lock().unwrap().insert(name.to_owned(), token.clone());
        Ok(())
    }

    async fn remove(&self, name: &str, _cancel: &CancellationToken) -> CacheResult<bool> {
        self.check()?;
        Ok(self.entries.lock().unwrap().remove(name).is_some())
    }
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

pub fn options_for(server: &MockServer) -> ClientOptions {
    ClientOptions::new(server.url(TOKEN_PATH)).with_authorize_url(server.url("/authorize"))
}

pub fn engine_for(server: &MockServer) -> AuthenticationEngine {
    AuthenticationEngine::new(build_reqwest_client(), options_for(server))
}
