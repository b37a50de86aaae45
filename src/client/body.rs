use serde::Serialize;
use serde_json::Value;

use crate::error::{AuthResult, AuthenticationError};
use crate::grants::{AuthorizationCodeRequest, ClientCredentialsRequest, GrantRequest};
use crate::utils::constants::{GRANT_AUTHORIZATION_CODE, GRANT_CLIENT_CREDENTIALS, GRANT_REFRESH_TOKEN};

#[derive(Serialize)]
struct ClientCredentialsBody<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    audience: Option<&'a str>,
    grant_type: &'static str,
}

impl<'a> From<&'a ClientCredentialsRequest> for ClientCredentialsBody<'a> {
    fn from(request: &'a ClientCredentialsRequest) -> Self {
        let scope = (!request.scopes.is_empty()).then(|| request.scopes.join(" "));
        Self {
            client_id: &request.client_id,
            client_secret: &request.client_secret,
            scope,
            audience: request.audience.as_deref(),
            grant_type: GRANT_CLIENT_CREDENTIALS,
        }
    }
}

#[derive(Serialize)]
struct AuthorizationCodeBody<'a> {
    grant_type: &'static str,
    code: &'a str,
    redirect_uri: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_secret: Option<&'a str>,
}

impl<'a> From<&'a AuthorizationCodeRequest> for AuthorizationCodeBody<'a> {
    fn from(request: &'a AuthorizationCodeRequest) -> Self {
        Self {
            grant_type: GRANT_AUTHORIZATION_CODE,
            code: &request.code,
            redirect_uri: request.redirect_uri.as_str(),
            client_id: request.client_id.as_deref(),
            client_secret: request.client_secret.as_deref(),
        }
    }
}

/// JSON body POSTed to the token endpoint for `request`.
pub fn build_token_request_body(request: &GrantRequest) -> AuthResult<Value> {
    let body = match request {
        GrantRequest::ClientCredentials(r) => serde_json::to_value(ClientCredentialsBody::from(r)),
        GrantRequest::AuthorizationCode(r) => serde_json::to_value(AuthorizationCodeBody::from(r)),
        GrantRequest::RefreshToken(_) => return Err(AuthenticationError::NotImplemented(GRANT_REFRESH_TOKEN)),
    };
    body.map_err(AuthenticationError::unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grants::RefreshTokenRequest;
    use serde_json::json;

    #[test]
    fn client_credentials_body_joins_scopes() {
        let request: GrantRequest = ClientCredentialsRequest::new("abc", "def")
            .unwrap()
            .with_scopes(["read:user", "write:user"])
            .into();
        let body = build_token_request_body(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "client_id": "abc",
                "client_secret": "def",
                "scope": "read:user write:user",
                "grant_type": "client_credentials"
            })
        );
    }

    #[test]
    fn client_credentials_body_with_audience_and_no_scopes() {
        let request: GrantRequest = ClientCredentialsRequest::new("abc", "def")
            .unwrap()
            .with_audience("https://api.example.com")
            .into();
        let body = build_token_request_body(&request).unwrap();
        assert_eq!(body["audience"], "https://api.example.com");
        assert!(body.get("scope").is_none());
    }

    #[test]
    fn authorization_code_body() {
        let request: GrantRequest = AuthorizationCodeRequest::new("xyz", "https://cb/")
            .unwrap()
            .with_client("abc", "def")
            .unwrap()
            .with_audience("https://api.example.com")
            .into();
        let body = build_token_request_body(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "grant_type": "authorization_code",
                "code": "xyz",
                "redirect_uri": "https://cb/",
                "client_id": "abc",
                "client_secret": "def"
            })
        );
    }

    #[test]
    fn refresh_token_is_not_implemented() {
        let request: GrantRequest = RefreshTokenRequest::new("r").unwrap().into();
        assert!(matches!(
            build_token_request_body(&request),
            Err(AuthenticationError::NotImplemented("refresh_token"))
        ));
    }
}
