//! Grant requests accepted by the engine and the authorization redirect builder.

pub mod authorize_url;
pub mod request;

pub use authorize_url::{build_authorization_url, AuthenticationCodeInfo};
pub use request::{
    AuthorizationCodeRequest, ClientCredentialsRequest, GrantRequest, GrantType, RefreshTokenRequest,
};
