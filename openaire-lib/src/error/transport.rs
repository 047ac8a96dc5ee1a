//! Transport error types

use super::AuthError;

/// Classification of a failed page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Network failure, timeout, throttling or a server-side (5xx) error.
    Transient,
    /// Client-side (4xx) or validation failure.
    Permanent,
    /// The response body could not be decoded.
    Malformed,
}

impl std::fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transient => f.write_str("transient"),
            Self::Permanent => f.write_str("permanent"),
            Self::Malformed => f.write_str("malformed"),
        }
    }
}

/// Errors reported by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// Retry-eligible failure.
    #[error("Transient error{}: {message}", status_suffix(.status))]
    Transient {
        /// HTTP status code, if the server answered.
        status: Option<u16>,
        message: String,
    },

    /// Non-retryable failure.
    #[error("Permanent error{}: {message}", status_suffix(.status))]
    Permanent {
        status: Option<u16>,
        message: String,
    },

    /// Undecodable response.
    #[error("Malformed response: {message}")]
    Malformed {
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },

    /// The token provider could not authenticate the request.
    #[error("Authentication failed")]
    Auth(#[from] AuthError),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl TransportError {
    /// Creates a transient error without a status code.
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            status: None,
            message: message.into(),
        }
    }

    /// Creates a permanent error without a status code.
    pub fn permanent(message: impl Into<String>) -> Self {
        Self::Permanent {
            status: None,
            message: message.into(),
        }
    }

    /// Creates a malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
            body: None,
        }
    }

    /// Classifies an HTTP error status.
    ///
    /// 408, 429 and 5xx are transient; every other status is permanent.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if matches!(status, 408 | 429) || (500..600).contains(&status) {
            Self::Transient {
                status: Some(status),
                message,
            }
        } else {
            Self::Permanent {
                status: Some(status),
                message,
            }
        }
    }

    /// Returns the classification of this error.
    pub fn kind(&self) -> TransportErrorKind {
        match self {
            Self::Transient { .. } => TransportErrorKind::Transient,
            Self::Permanent { .. } | Self::Auth(_) => TransportErrorKind::Permanent,
            Self::Malformed { .. } => TransportErrorKind::Malformed,
        }
    }

    /// Returns the HTTP status code, if known.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Transient { status, .. } | Self::Permanent { status, .. } => *status,
            Self::Malformed { .. } | Self::Auth(_) => None,
        }
    }

    /// Returns `true` if the fetch may succeed when retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::malformed(err.to_string());
        }
        match err.status() {
            Some(status) => Self::from_status(status.as_u16(), err.to_string()),
            // Connect, timeout and body errors never reached a status line.
            None if err.is_builder() => Self::permanent(err.to_string()),
            None => Self::transient(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(TransportError::from_status(503, "x").kind(), TransportErrorKind::Transient);
        assert_eq!(TransportError::from_status(500, "x").kind(), TransportErrorKind::Transient);
        assert_eq!(TransportError::from_status(429, "x").kind(), TransportErrorKind::Transient);
        assert_eq!(TransportError::from_status(408, "x").kind(), TransportErrorKind::Transient);
        assert_eq!(TransportError::from_status(400, "x").kind(), TransportErrorKind::Permanent);
        assert_eq!(TransportError::from_status(404, "x").kind(), TransportErrorKind::Permanent);
    }

    #[test]
    fn test_only_transient_is_retryable() {
        assert!(TransportError::transient("timeout").is_retryable());
        assert!(!TransportError::permanent("bad request").is_retryable());
        assert!(!TransportError::malformed("not json").is_retryable());
    }

    #[test]
    fn test_display_includes_status() {
        let err = TransportError::from_status(502, "bad gateway");
        assert_eq!(err.to_string(), "Transient error (HTTP 502): bad gateway");
        assert_eq!(err.status_code(), Some(502));
    }

    #[test]
    fn test_auth_failure_is_permanent_with_typed_source() {
        let err = TransportError::from(AuthError::Unavailable("no key".to_string()));
        assert_eq!(err.kind(), TransportErrorKind::Permanent);
        assert!(!err.is_retryable());
        assert_eq!(err.status_code(), None);

        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "Token unavailable: no key");
        assert!(matches!(err, TransportError::Auth(AuthError::Unavailable(_))));
    }
}
