use thiserror::Error;

/// Top-level error type for the `netdesk-api` crate.
///
/// Covers every failure mode of the REST surface: authentication,
/// transport, structured API errors, and malformed payloads.
/// `netdesk-core` maps these into user-facing errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token rejected or missing (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Token valid but the server refused the operation (HTTP 403).
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL cannot carry path segments (e.g. `mailto:`).
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Request exceeded the client's configured timeout.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-success response. `message` is taken from the response body
    /// when the server supplied one.
    #[error("API error (HTTP {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
        code: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// The message the server put in its error payload, if any.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            Self::Authentication { message } | Self::Forbidden { message } => Some(message),
            _ => None,
        }
    }

    /// Extract the API error code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn api_error_display_falls_back_without_message() {
        let err = Error::Api {
            status: 500,
            message: None,
            code: None,
        };
        assert_eq!(err.to_string(), "API error (HTTP 500): no message");
        assert!(err.api_message().is_none());
    }

    #[test]
    fn api_error_exposes_server_message() {
        let err = Error::Api {
            status: 409,
            message: Some("customers assigned".into()),
            code: Some("PACKAGE_IN_USE".into()),
        };
        assert_eq!(err.api_message(), Some("customers assigned"));
        assert_eq!(err.api_error_code(), Some("PACKAGE_IN_USE"));
        assert!(!err.is_not_found());
    }
}
