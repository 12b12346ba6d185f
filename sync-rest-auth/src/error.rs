//! Credential error types.

use thiserror::Error;

/// Result type for credential operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors that can occur while obtaining or refreshing a bearer token.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No grant, must Authenticate")]
    NoGrant,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token endpoint returned {status} status: {body}")]
    TokenEndpoint { status: u16, body: String },

    #[error("invalid token response: {0}")]
    InvalidTokenResponse(String),

    #[error("grant refresh rejected: {0}")]
    RefreshRejected(String),

    #[error("credentials unavailable: refresh failed ({refresh}); authenticate failed ({authenticate})")]
    Unavailable {
        refresh: Box<AuthError>,
        authenticate: Box<AuthError>,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}
