//! Error taxonomy surfaced by the authentication engine.

use http::StatusCode;
use thiserror::Error;

/// Boxed cause carried by wrapped failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type AuthResult<T> = std::result::Result<T, AuthenticationError>;

#[derive(Error, Debug)]
pub enum AuthenticationError {
    /// A required value is missing or malformed.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// Grant type discriminant is not one the engine knows about.
    #[error("grant type '{0}' is not supported")]
    UnsupportedGrant(String),

    #[error("grant type '{0}' is not implemented")]
    NotImplemented(&'static str),

    /// Token endpoint rejected the exchange or answered with an incomplete body.
    #[error("provider error: {message}")]
    Provider {
        status: Option<StatusCode>,
        message: String,
    },

    /// Failure reported by the token cache collaborator.
    #[error("token cache failure")]
    Cache(#[source] BoxError),

    /// The caller's cancellation token fired before the exchange completed.
    #[error("token acquisition cancelled")]
    Cancelled,

    #[error("unknown error")]
    Unknown(#[source] BoxError),
}

impl AuthenticationError {
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        AuthenticationError::InvalidArgument { name, reason: reason.into() }
    }

    pub fn provider(message: impl Into<String>) -> Self {
        AuthenticationError::Provider { status: None, message: message.into() }
    }

    pub fn provider_status(status: StatusCode) -> Self {
        let reason = status.canonical_reason().unwrap_or("unknown status");
        AuthenticationError::Provider {
            status: Some(status),
            message: format!("token endpoint responded {} {}", status.as_u16(), reason),
        }
    }

    pub fn unknown<E>(cause: E) -> Self
    where
        E: Into<BoxError>,
    {
        AuthenticationError::Unknown(cause.into())
    }

    /// HTTP status of a provider failure, if the provider answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AuthenticationError::Provider { status, .. } => *status,
            _ => None,
        }
    }

    /// Short label used for metrics and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthenticationError::InvalidArgument { .. } => "invalid_argument",
            AuthenticationError::UnsupportedGrant(_) => "unsupported_grant",
            AuthenticationError::NotImplemented(_) => "not_implemented",
            AuthenticationError::Provider { .. } => "provider",
            AuthenticationError::Cache(_) => "cache",
            AuthenticationError::Cancelled => "cancelled",
            AuthenticationError::Unknown(_) => "unknown",
        }
    }
}
