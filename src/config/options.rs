use serde::Deserialize;

use crate::error::AuthResult;
use crate::grants::GrantType;
use crate::utils::constants::{DEFAULT_TOKEN_EXPIRATION_SECS, GRANT_CLIENT_CREDENTIALS};

/// ================================
/// Authorization server client options
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ClientOptions {
    /// Token endpoint every grant is POSTed to.
    pub token_url: String,
    /// Base of the authorization-code redirect.
    pub authorize_url: Option<String>,
    /// Cache lifetime (seconds) when the provider omits `expires_in`.
    #[serde(default = "default_token_expiration")]
    pub default_token_expiration: u64,
    /// Grant used by the `token` command, `client_credentials` when unset.
    pub grant_type: Option<String>,

    // client-credentials defaults, used by the request authenticator
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub audience: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    pub token_name: Option<String>,
}

impl ClientOptions {
    pub fn new(token_url: impl Into<String>) -> Self {
        Self {
            token_url: token_url.into(),
            authorize_url: None,
            default_token_expiration: DEFAULT_TOKEN_EXPIRATION_SECS,
            grant_type: None,
            client_id: None,
            client_secret: None,
            audience: None,
            scopes: Vec::new(),
            token_name: None,
        }
    }

    pub fn with_authorize_url(mut self, authorize_url: impl Into<String>) -> Self {
        self.authorize_url = Some(authorize_url.into());
        self
    }

    pub fn with_default_token_expiration(mut self, seconds: u64) -> Self {
        self.default_token_expiration = seconds;
        self
    }

    pub fn with_grant_type(mut self, grant_type: impl Into<String>) -> Self {
        self.grant_type = Some(grant_type.into());
        self
    }

    /// Configured grant type; unknown names fail with `UnsupportedGrant`.
    pub fn resolved_grant_type(&self) -> AuthResult<GrantType> {
        self.grant_type.as_deref().unwrap_or(GRANT_CLIENT_CREDENTIALS).parse()
    }

    pub fn with_client(mut self, client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(client_secret.into());
        self
    }
}

fn default_token_expiration() -> u64 {
    DEFAULT_TOKEN_EXPIRATION_SECS
}
