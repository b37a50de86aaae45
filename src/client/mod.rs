pub mod authenticator;
pub mod body;
pub mod engine;

pub use authenticator::ClientCredentialsAuthenticator;
pub use engine::AuthenticationEngine;
