#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;

    use crate::config::loader::{file_to_config, parse_config};
    use crate::config::settings::LogFormat;
    use crate::error::AuthenticationError;
    use crate::grants::{GrantRequest, GrantType};
    use crate::utils::constants::DEFAULT_TOKEN_EXPIRATION_SECS;
    use crate::utils::logging::{resolve, LogLevel};

    const CONFIG: &str = r#"
settings:
  logging:
    level: debug
    format: json
client:
  token_url: https://auth.example.com/oauth/token
  authorize_url: https://auth.example.com/authorize
  client_id: ${OAUTH_TEST_CLIENT_ID}
  client_secret: ${OAUTH_TEST_CLIENT_SECRET:fallback-secret}
  scopes: ["read:user", "write:user"]
  token_name: api
"#;

    #[tokio::test]
    #[serial]
    async fn loads_yaml_with_env_expansion() {
        std::env::set_var("OAUTH_TEST_CLIENT_ID", "svc");
        std::env::remove_var("OAUTH_TEST_CLIENT_SECRET");

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();

        let config = file_to_config(file.path()).await.unwrap();
        let client = &config.client;
        assert_eq!(client.token_url, "https://auth.example.com/oauth/token");
        assert_eq!(client.client_id.as_deref(), Some("svc"));
        assert_eq!(client.client_secret.as_deref(), Some("fallback-secret"));
        assert_eq!(client.scopes, vec!["read:user", "write:user"]);
        assert_eq!(client.default_token_expiration, DEFAULT_TOKEN_EXPIRATION_SECS);

        let logging = config.settings.logging.as_ref().unwrap();
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.format, LogFormat::Json);

        std::env::remove_var("OAUTH_TEST_CLIENT_ID");
    }

    #[test]
    fn logging_defaults_and_cli_override() {
        let config = parse_config("client:\n  token_url: https://auth.example.com/token\n").unwrap();
        let logging = resolve(&config, None);
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, LogFormat::Compact);

        let logging = resolve(&config, Some(LogLevel::TRACE));
        assert_eq!(logging.level, "TRACE");
    }

    #[test]
    fn rejects_invalid_token_url() {
        let err = parse_config("client:\n  token_url: not a url\n").unwrap_err();
        assert!(err.to_string().contains("token_url"));
    }

    #[test]
    fn rejects_zero_default_expiration() {
        let err = parse_config(
            "client:\n  token_url: https://auth.example.com/token\n  default_token_expiration: 0\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("default_token_expiration"));
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let err = file_to_config(std::path::Path::new("does/not/exist.yaml")).await.unwrap_err();
        assert!(err.to_string().contains("does/not/exist.yaml"));
    }

    fn client_with_grant(grant_type: Option<&str>) -> crate::config::AgentConfig {
        let mut yaml = String::from(
            "client:\n  token_url: https://auth.example.com/token\n  client_id: svc\n  client_secret: s3cret\n  token_name: api\n",
        );
        if let Some(grant_type) = grant_type {
            yaml.push_str(&format!("  grant_type: {}\n", grant_type));
        }
        parse_config(&yaml).unwrap()
    }

    #[test]
    fn configured_grant_type_selects_the_request() {
        let config = client_with_grant(None);
        let request = GrantRequest::from_options(&config.client, None, None).unwrap();
        assert_eq!(request.grant_type(), GrantType::ClientCredentials);
        assert_eq!(request.token_name(), Some("api"));

        let config = client_with_grant(Some("authorization_code"));
        let request =
            GrantRequest::from_options(&config.client, Some("xyz"), Some("https://app.example.com/cb")).unwrap();
        assert_eq!(request.grant_type(), GrantType::AuthorizationCode);

        let err = GrantRequest::from_options(&config.client, None, Some("https://app.example.com/cb")).unwrap_err();
        assert!(matches!(err, AuthenticationError::InvalidArgument { name: "code", .. }));
    }

    #[test]
    fn unknown_grant_type_is_unsupported() {
        let config = client_with_grant(Some("password"));
        let err = GrantRequest::from_options(&config.client, None, None).unwrap_err();
        assert!(matches!(err, AuthenticationError::UnsupportedGrant(ref name) if name == "password"));
        assert_eq!(err.reason(), "unsupported_grant");
    }

    #[test]
    fn refresh_grant_is_not_implemented() {
        let config = client_with_grant(Some("refresh_token"));
        let err = GrantRequest::from_options(&config.client, None, None).unwrap_err();
        assert!(matches!(err, AuthenticationError::NotImplemented("refresh_token")));
    }
}
