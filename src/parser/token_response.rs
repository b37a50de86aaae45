use http::header::CACHE_CONTROL;
use http::HeaderMap;
use serde_json::Value;
use tracing::warn;

use crate::error::{AuthResult, AuthenticationError};
use crate::token::{AccessToken, CachePolicy};

static ACCESS_TOKEN_FIELD: &str = "access_token";
static TOKEN_TYPE_FIELD: &str = "token_type";
static EXPIRES_IN_FIELD: &str = "expires_in";
static SCOPE_FIELD: &str = "scope";
static REFRESH_TOKEN_FIELD: &str = "refresh_token";

/// Turn a successful token endpoint response into an [`AccessToken`].
///
/// Body fields `access_token` and `token_type` are mandatory, `expires_in`,
/// `scope` and `refresh_token` are picked up when present. A `no-store`
/// directive in `Cache-Control` marks the token as not cacheable.
pub fn parse_token_response(headers: &HeaderMap, body: &str) -> AuthResult<AccessToken> {
    let json: Value = serde_json::from_str(body).map_err(AuthenticationError::unknown)?;
    if !json.is_object() {
        return Err(AuthenticationError::provider("the token response is not a JSON object"));
    }

    let access_token = required_str(&json, ACCESS_TOKEN_FIELD)?;
    let token_type = required_str(&json, TOKEN_TYPE_FIELD)?;
    let expires_in = json.get(EXPIRES_IN_FIELD).and_then(parse_expires_in);

    let token = AccessToken::new(token_type, access_token, expires_in)?
        .with_scope(optional_str(&json, SCOPE_FIELD))
        .with_refresh_token(optional_str(&json, REFRESH_TOKEN_FIELD))
        .with_cache_policy(cache_policy(headers));
    Ok(token)
}

fn required_str(json: &Value, field: &str) -> AuthResult<String> {
    json.get(field)
        .and_then(Value::as_str)
        .filter(|v| !v.trim().is_empty())
        .map(str::to_owned)
        .ok_or_else(|| AuthenticationError::provider(format!("the provider returned no '{}' in the response", field)))
}

fn optional_str(json: &Value, field: &str) -> Option<String> {
    json.get(field).and_then(Value::as_str).map(str::to_owned)
}

/// Seconds as a JSON number, or as a numeric string some providers send.
fn parse_expires_in(value: &Value) -> Option<u64> {
    let parsed = match value {
        Value::Null => return None,
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    if parsed.is_none() {
        warn!("ignoring malformed expires_in: {}", value);
    }
    parsed
}

fn cache_policy(headers: &HeaderMap) -> CachePolicy {
    let directives: Vec<&str> = headers
        .get_all(CACHE_CONTROL)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    if directives.is_empty() {
        return CachePolicy::Default;
    }
    CachePolicy::from_cache_control(Some(&directives.join(",")))
}
