//! Authentication error types

/// Errors that can occur while obtaining a bearer token.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    /// The token has expired and the provider cannot refresh it.
    #[error("Token expired: {message}")]
    TokenExpired { message: String },

    /// The provider could not produce a token.
    #[error("Token unavailable: {0}")]
    Unavailable(String),
}
