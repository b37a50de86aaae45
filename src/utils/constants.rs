//! Shared constants and invariants

/// Cache lifetime used when the provider does not send `expires_in` (one day).
pub const DEFAULT_TOKEN_EXPIRATION_SECS: u64 = 60 * 60 * 24;

// Supported grant types
pub const GRANT_CLIENT_CREDENTIALS: &str = "client_credentials";
pub const GRANT_AUTHORIZATION_CODE: &str = "authorization_code";
pub const GRANT_REFRESH_TOKEN: &str = "refresh_token";

pub const RESPONSE_TYPE_CODE: &str = "code";
