//! # OAuth2 Token Agent Library
//!
//! Acquires OAuth2 access tokens from an authorization server and keeps them
//! in a pluggable cache so repeated requests skip the network round-trip.
//!
//! Modules:
//! - `client` — the authentication engine and the request authenticator
//! - `grants` — grant requests and the authorization redirect builder
//! - `token` — the access token and its cache policy
//! - `cache` — the token cache contract
//! - `parser` — token endpoint response validation
//! - `config` — client options and YAML loading
//! - `observability` — prometheus metrics

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod grants;
pub mod helpers;
pub mod observability;
pub mod parser;
pub mod token;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::cache::TokenCache;
pub use crate::client::{AuthenticationEngine, ClientCredentialsAuthenticator};
pub use crate::config::ClientOptions;
pub use crate::error::{AuthResult, AuthenticationError};
pub use crate::grants::{
    build_authorization_url, AuthenticationCodeInfo, AuthorizationCodeRequest, ClientCredentialsRequest,
    GrantRequest, GrantType, RefreshTokenRequest,
};
pub use crate::token::{AccessToken, CachePolicy};
