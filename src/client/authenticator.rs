use http::header::AUTHORIZATION;
use reqwest::RequestBuilder;
use tokio_util::sync::CancellationToken;

use crate::client::engine::AuthenticationEngine;
use crate::error::{AuthResult, AuthenticationError};
use crate::grants::{ClientCredentialsRequest, GrantRequest};
use crate::token::AccessToken;

/// Signs outbound requests with a client-credentials token built from the
/// engine's [`ClientOptions`](crate::config::ClientOptions).
#[derive(Clone)]
pub struct ClientCredentialsAuthenticator {
    engine: AuthenticationEngine,
    request: GrantRequest,
}

impl ClientCredentialsAuthenticator {
    pub fn new(engine: AuthenticationEngine) -> AuthResult<Self> {
        let request = ClientCredentialsRequest::from_options(engine.options())?;
        if engine.has_cache() && request.token_name.is_none() {
            return Err(AuthenticationError::invalid_argument(
                "token_name",
                "must be provided when a token cache is configured",
            ));
        }

        Ok(Self { engine, request: request.into() })
    }

    pub async fn token(&self, cancel: &CancellationToken) -> AuthResult<AccessToken> {
        self.engine.acquire(&self.request, cancel).await
    }

    /// Attach `Authorization: <token_type> <access_token>` to `builder`.
    pub async fn authenticate(&self, builder: RequestBuilder, cancel: &CancellationToken) -> AuthResult<RequestBuilder> {
        let token = self.token(cancel).await?;
        Ok(builder.header(AUTHORIZATION, token.authorization_header()))
    }
}
