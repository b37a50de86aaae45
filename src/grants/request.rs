use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::config::ClientOptions;
use crate::error::{AuthResult, AuthenticationError};
use crate::utils::constants::{GRANT_AUTHORIZATION_CODE, GRANT_CLIENT_CREDENTIALS, GRANT_REFRESH_TOKEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrantType {
    ClientCredentials,
    AuthorizationCode,
    RefreshToken,
}

impl GrantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantType::ClientCredentials => GRANT_CLIENT_CREDENTIALS,
            GrantType::AuthorizationCode => GRANT_AUTHORIZATION_CODE,
            GrantType::RefreshToken => GRANT_REFRESH_TOKEN,
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GrantType {
    type Err = AuthenticationError;

    fn from_str(s: &str) -> AuthResult<Self> {
        match s.trim() {
            GRANT_CLIENT_CREDENTIALS => Ok(GrantType::ClientCredentials),
            GRANT_AUTHORIZATION_CODE => Ok(GrantType::AuthorizationCode),
            GRANT_REFRESH_TOKEN => Ok(GrantType::RefreshToken),
            other => Err(AuthenticationError::UnsupportedGrant(other.to_owned())),
        }
    }
}

/// A token request, one variant per grant type.
#[derive(Debug, Clone)]
pub enum GrantRequest {
    ClientCredentials(ClientCredentialsRequest),
    AuthorizationCode(AuthorizationCodeRequest),
    RefreshToken(RefreshTokenRequest),
}

impl GrantRequest {
    pub fn grant_type(&self) -> GrantType {
        match self {
            GrantRequest::ClientCredentials(_) => GrantType::ClientCredentials,
            GrantRequest::AuthorizationCode(_) => GrantType::AuthorizationCode,
            GrantRequest::RefreshToken(_) => GrantType::RefreshToken,
        }
    }

    /// Cache key; `None` (or blank) disables caching for this request.
    pub fn token_name(&self) -> Option<&str> {
        let name = match self {
            GrantRequest::ClientCredentials(r) => r.token_name.as_deref(),
            GrantRequest::AuthorizationCode(r) => r.token_name.as_deref(),
            GrantRequest::RefreshToken(r) => r.token_name.as_deref(),
        };
        name.filter(|n| !n.trim().is_empty())
    }

    /// Request for the grant configured in `options`.
    ///
    /// `code` and `redirect_uri` are only read for `authorization_code`. The
    /// refresh grant has no executor and fails with `NotImplemented`.
    pub fn from_options(
        options: &ClientOptions,
        code: Option<&str>,
        redirect_uri: Option<&str>,
    ) -> AuthResult<Self> {
        match options.resolved_grant_type()? {
            GrantType::ClientCredentials => ClientCredentialsRequest::from_options(options).map(Into::into),
            GrantType::AuthorizationCode => {
                let code = code.ok_or_else(|| AuthenticationError::invalid_argument("code", "required for authorization_code"))?;
                let redirect_uri = redirect_uri
                    .ok_or_else(|| AuthenticationError::invalid_argument("redirect_uri", "required for authorization_code"))?;
                let mut request = AuthorizationCodeRequest::new(code, redirect_uri)?;
                if let (Some(id), Some(secret)) = (options.client_id.clone(), options.client_secret.clone()) {
                    request = request.with_client(id, secret)?;
                }
                if let Some(audience) = options.audience.clone() {
                    request = request.with_audience(audience);
                }
                if let Some(token_name) = options.token_name.clone() {
                    request = request.with_token_name(token_name);
                }
                Ok(request.into())
            }
            GrantType::RefreshToken => Err(AuthenticationError::NotImplemented(GRANT_REFRESH_TOKEN)),
        }
    }
}

impl From<ClientCredentialsRequest> for GrantRequest {
    fn from(value: ClientCredentialsRequest) -> Self {
        GrantRequest::ClientCredentials(value)
    }
}

impl From<AuthorizationCodeRequest> for GrantRequest {
    fn from(value: AuthorizationCodeRequest) -> Self {
        GrantRequest::AuthorizationCode(value)
    }
}

impl From<RefreshTokenRequest> for GrantRequest {
    fn from(value: RefreshTokenRequest) -> Self {
        GrantRequest::RefreshToken(value)
    }
}

#[derive(Debug, Clone)]
pub struct ClientCredentialsRequest {
    pub(crate) token_name: Option<String>,
    pub(crate) client_id: String,
    pub(crate) client_secret: String,
    pub(crate) audience: Option<String>,
    pub(crate) scopes: Vec<String>,
}

impl ClientCredentialsRequest {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> AuthResult<Self> {
        Ok(Self {
            token_name: None,
            client_id: required("client_id", client_id.into())?,
            client_secret: required("client_secret", client_secret.into())?,
            audience: None,
            scopes: Vec::new(),
        })
    }

    /// Client credentials, audience, scopes and token name taken from `options`.
    pub fn from_options(options: &ClientOptions) -> AuthResult<Self> {
        let client_id = options
            .client_id
            .clone()
            .ok_or_else(|| AuthenticationError::invalid_argument("client_id", "missing in client options"))?;
        let client_secret = options
            .client_secret
            .clone()
            .ok_or_else(|| AuthenticationError::invalid_argument("client_secret", "missing in client options"))?;

        let mut request = Self::new(client_id, client_secret)?.with_scopes(options.scopes.clone());
        request.audience = options.audience.clone();
        request.token_name = options.token_name.clone().filter(|n| !n.trim().is_empty());
        Ok(request)
    }

    pub fn with_token_name(mut self, token_name: impl Into<String>) -> Self {
        self.token_name = Some(token_name.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn audience(&self) -> Option<&str> {
        self.audience.as_deref()
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }
}

#[derive(Debug, Clone)]
pub struct AuthorizationCodeRequest {
    pub(crate) token_name: Option<String>,
    pub(crate) code: String,
    pub(crate) redirect_uri: Url,
    pub(crate) client_id: Option<String>,
    pub(crate) client_secret: Option<String>,
    pub(crate) audience: Option<String>,
}

impl AuthorizationCodeRequest {
    pub fn new(code: impl Into<String>, redirect_uri: &str) -> AuthResult<Self> {
        let code = required("code", code.into())?;
        let redirect_uri = Url::parse(redirect_uri)
            .map_err(|e| AuthenticationError::invalid_argument("redirect_uri", e.to_string()))?;
        Ok(Self {
            token_name: None,
            code,
            redirect_uri,
            client_id: None,
            client_secret: None,
            audience: None,
        })
    }

    /// Client credentials sent along with the code, when the provider wants them.
    pub fn with_client(mut self, client_id: impl Into<String>, client_secret: impl Into<String>) -> AuthResult<Self> {
        self.client_id = Some(required("client_id", client_id.into())?);
        self.client_secret = Some(required("client_secret", client_secret.into())?);
        Ok(self)
    }

    pub fn with_token_name(mut self, token_name: impl Into<String>) -> Self {
        self.token_name = Some(token_name.into());
        self
    }

    /// Kept on the request only; the code exchange body does not carry it.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn redirect_uri(&self) -> &Url {
        &self.redirect_uri
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn audience(&self) -> Option<&str> {
        self.audience.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct RefreshTokenRequest {
    pub(crate) token_name: Option<String>,
    pub(crate) refresh_token: String,
}

impl RefreshTokenRequest {
    pub fn new(refresh_token: impl Into<String>) -> AuthResult<Self> {
        Ok(Self {
            token_name: None,
            refresh_token: required("refresh_token", refresh_token.into())?,
        })
    }

    pub fn with_token_name(mut self, token_name: impl Into<String>) -> Self {
        self.token_name = Some(token_name.into());
        self
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }
}

fn required(name: &'static str, value: String) -> AuthResult<String> {
    if value.trim().is_empty() {
        return Err(AuthenticationError::invalid_argument(name, "cannot be empty or whitespace"));
    }
    Ok(value)
}
