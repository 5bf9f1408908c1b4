// ── Core error types ──
//
// User-facing errors from netdesk-core. Consumers never match on HTTP
// details directly; the `From<netdesk_api::Error>` impl translates
// transport-layer errors into domain variants.

use thiserror::Error;

use crate::form::ValidationErrors;
use crate::permission::Permission;

/// Shown when the server gave no usable message.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// `timeout_secs` is unknown when the HTTP client was supplied by
    /// the caller.
    #[error("Request timed out{}", .timeout_secs.map(|s| format!(" after {s}s")).unwrap_or_default())]
    Timeout { timeout_secs: Option<u64> },

    // ── Access ───────────────────────────────────────────────────────
    #[error("Permission denied: requires {permission}")]
    PermissionDenied { permission: Permission },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    /// A local business guard refused the action before any request.
    #[error("{message}")]
    Rejected { message: String },

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationErrors),

    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {}", .message.as_deref().unwrap_or(GENERIC_FAILURE))]
    Api {
        message: Option<String>,
        code: Option<String>,
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The text to show a user: the server's message when it sent one,
    /// local guard and validation text as is, the generic line otherwise.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api {
                message: Some(message),
                ..
            }
            | Self::Rejected { message }
            | Self::AuthenticationFailed { message }
            | Self::Forbidden { message } => message.clone(),
            Self::ValidationFailed(errors) => errors.to_string(),
            Self::PermissionDenied { .. } | Self::NotFound { .. } | Self::Timeout { .. } => {
                self.to_string()
            }
            _ => GENERIC_FAILURE.to_owned(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::Api {
                    status: Some(404),
                    ..
                }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<netdesk_api::Error> for CoreError {
    fn from(err: netdesk_api::Error) -> Self {
        match err {
            netdesk_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            netdesk_api::Error::Forbidden { message } => CoreError::Forbidden { message },
            netdesk_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: None }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: None,
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            netdesk_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            netdesk_api::Error::InvalidBaseUrl(url) => CoreError::Config {
                message: format!("Invalid base URL: {url}"),
            },
            netdesk_api::Error::Timeout { timeout_secs } => CoreError::Timeout {
                timeout_secs: Some(timeout_secs),
            },
            netdesk_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            netdesk_api::Error::Api {
                status: 404,
                message: None,
                ..
            } => CoreError::NotFound {
                entity_type: "Resource".into(),
                identifier: String::new(),
            },
            netdesk_api::Error::Api {
                status,
                message,
                code,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            netdesk_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
