// ── Core error types ──
//
// Controller-facing errors from stockroom-core. Consumers never see HTTP
// plumbing or JSON parse failures directly: the `From<stockroom_api::Error>`
// impl translates gateway errors into domain-appropriate variants.

use thiserror::Error;

use crate::model::FieldErrors;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    #[error("{message}")]
    AuthenticationFailed { message: String },

    /// The backend rejected the bearer token (HTTP 401).
    #[error("Session expired -- please log in again")]
    SessionExpired,

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Equipment not found: {identifier}")]
    NotFound { identifier: String },

    #[error("{}", .0)]
    Validation(FieldErrors),

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("{message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Local state errors ───────────────────────────────────────────
    #[error("Session storage error: {message}")]
    Persistence { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` if this error should end the session.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    /// Per-field messages if this is a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

// ── Conversion from gateway errors ───────────────────────────────────

impl From<stockroom_api::Error> for CoreError {
    fn from(err: stockroom_api::Error) -> Self {
        if err.is_unauthorized() {
            return CoreError::SessionExpired;
        }
        let status = err.status();
        if err.is_not_found() {
            let identifier = match err {
                stockroom_api::Error::Api { message, .. } => message,
                other => other.to_string(),
            };
            return CoreError::NotFound { identifier };
        }

        match err {
            stockroom_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            stockroom_api::Error::Transport(ref e) if e.is_timeout() => CoreError::Timeout,
            stockroom_api::Error::Transport(ref e) if e.is_connect() => {
                CoreError::ConnectionFailed {
                    url: e
                        .url()
                        .map(|u| u.to_string())
                        .unwrap_or_else(|| "<unknown>".into()),
                    reason: e.to_string(),
                }
            }
            stockroom_api::Error::Transport(e) => CoreError::Api {
                message: e.to_string(),
                status,
            },
            stockroom_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            stockroom_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            stockroom_api::Error::Api { message, .. } => CoreError::Api { message, status },
            stockroom_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            stockroom_api::Error::Unauthorized => CoreError::SessionExpired,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CoreError;

    #[test]
    fn unauthorized_becomes_session_expired() {
        let err = CoreError::from(stockroom_api::Error::Unauthorized);
        assert!(err.is_session_expired());
    }

    #[test]
    fn login_rejection_keeps_server_message() {
        let err = CoreError::from(stockroom_api::Error::Authentication {
            message: "Invalid credentials".into(),
        });
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn backend_errors_keep_status() {
        let err = CoreError::from(stockroom_api::Error::Api {
            status: 500,
            message: "Internal Server Error".into(),
        });
        assert!(matches!(
            err,
            CoreError::Api {
                status: Some(500),
                ..
            }
        ));
    }

    #[test]
    fn not_found_carries_backend_message() {
        let err = CoreError::from(stockroom_api::Error::Api {
            status: 404,
            message: "Equipment not found".into(),
        });
        assert!(
            matches!(err, CoreError::NotFound { ref identifier } if identifier == "Equipment not found")
        );
    }

    #[test]
    fn client_errors_keep_status() {
        let err = CoreError::from(stockroom_api::Error::Api {
            status: 422,
            message: "Code already exists".into(),
        });
        assert_eq!(err.to_string(), "Code already exists");
        assert!(matches!(err, CoreError::Api { status: Some(422), .. }));
    }
}
