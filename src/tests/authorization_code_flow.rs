#[cfg(test)]
mod tests {
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::json;
    use tokio_util::sync::CancellationToken;

    use crate::error::AuthenticationError;
    use crate::grants::{AuthenticationCodeInfo, AuthorizationCodeRequest, GrantRequest, RefreshTokenRequest};
    use crate::tests::common::{engine_for, RecordingCache, TOKEN_PATH};

    #[tokio::test]
    async fn exchanges_code_for_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path(TOKEN_PATH).json_body(json!({
                    "grant_type": "authorization_code",
                    "code": "c0de",
                    "redirect_uri": "https://cb/",
                    "client_id": "abc",
                    "client_secret": "def"
                }));
                then.status(200).json_body(json!({
                    "access_token": "user-token",
                    "token_type": "Bearer",
                    "expires_in": 3600,
                    "refresh_token": "r-1",
                    "scope": "openid profile"
                }));
            })
            .await;

        let request: GrantRequest = AuthorizationCodeRequest::new("c0de", "https://cb/")
            .unwrap()
            .with_client("abc", "def")
            .unwrap()
            .into();
        let token = engine_for(&server).acquire(&request, &CancellationToken::new()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(token.access_token(), "user-token");
        assert_eq!(token.refresh_token(), Some("r-1"));
        assert_eq!(token.scope(), Some("openid profile"));
    }

    #[tokio::test]
    async fn refresh_token_grant_fails_fast() {
        let server = MockServer::start_async().await;
        let cache = RecordingCache::new();
        let engine = engine_for(&server).with_cache(cache.clone());

        for value in ["r-1", "another"] {
            let request: GrantRequest = RefreshTokenRequest::new(value).unwrap().with_token_name("x").into();
            let err = engine.acquire(&request, &CancellationToken::new()).await.unwrap_err();
            assert!(matches!(err, AuthenticationError::NotImplemented("refresh_token")));
        }
        assert!(cache.sets().is_empty());
    }

    #[tokio::test]
    async fn authorization_url_uses_configured_base() {
        let server = MockServer::start_async().await;
        let info = AuthenticationCodeInfo::new("c1", "https://cb/").unwrap().with_state("s1");

        let url = engine_for(&server).authorization_url(&info).unwrap();

        assert!(url.as_str().starts_with(&server.url("/authorize")));
        assert_eq!(
            url.query(),
            Some("client_id=c1&response_type=code&redirect_uri=https%3A%2F%2Fcb%2F&state=s1")
        );
    }

    #[tokio::test]
    async fn authorization_url_requires_authorize_url() {
        let engine = crate::client::AuthenticationEngine::new(
            reqwest::Client::new(),
            crate::config::ClientOptions::new("https://auth.example.com/token"),
        );
        let info = AuthenticationCodeInfo::new("c1", "https://cb/").unwrap();

        assert!(matches!(
            engine.authorization_url(&info),
            Err(AuthenticationError::InvalidArgument { name: "authorize_url", .. })
        ));
    }
}
