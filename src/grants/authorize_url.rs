use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use crate::error::{AuthResult, AuthenticationError};
use crate::utils::constants::RESPONSE_TYPE_CODE;

/// Everything but the RFC 3986 unreserved characters is escaped.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Parameters of the authorization-code redirect.
#[derive(Debug, Clone)]
pub struct AuthenticationCodeInfo {
    client_id: String,
    redirect_uri: Url,
    scopes: Vec<String>,
    /// Opaque value echoed back by the provider, used against CSRF.
    state: Option<String>,
}

impl AuthenticationCodeInfo {
    pub fn new(client_id: impl Into<String>, redirect_uri: &str) -> AuthResult<Self> {
        let client_id = client_id.into();
        if client_id.trim().is_empty() {
            return Err(AuthenticationError::invalid_argument("client_id", "cannot be empty or whitespace"));
        }
        let redirect_uri = Url::parse(redirect_uri)
            .map_err(|e| AuthenticationError::invalid_argument("redirect_uri", e.to_string()))?;
        Ok(Self { client_id, redirect_uri, scopes: Vec::new(), state: None })
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
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
}

/// Build the provider redirect for the authorization-code flow.
///
/// Query order is fixed: `client_id`, `response_type=code`, `redirect_uri`,
/// then `state` and `scope` when present. Any query already on
/// `authorize_base_url` is kept in front.
pub fn build_authorization_url(info: &AuthenticationCodeInfo, authorize_base_url: &str) -> AuthResult<Url> {
    let mut url = Url::parse(authorize_base_url)
        .map_err(|e| AuthenticationError::invalid_argument("authorize_url", e.to_string()))?;

    let mut pairs: Vec<(&str, String)> = vec![
        ("client_id", encode(&info.client_id)),
        ("response_type", RESPONSE_TYPE_CODE.to_owned()),
        ("redirect_uri", encode(info.redirect_uri.as_str())),
    ];
    if let Some(state) = info.state.as_deref().filter(|s| !s.is_empty()) {
        pairs.push(("state", encode(state)));
    }
    if !info.scopes.is_empty() {
        pairs.push(("scope", encode(&info.scopes.join(" "))));
    }

    let mut query = url.query().filter(|q| !q.is_empty()).map(str::to_owned).unwrap_or_default();
    for (key, value) in pairs {
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(key);
        query.push('=');
        query.push_str(&value);
    }
    url.set_query(Some(&query));
    Ok(url)
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}
