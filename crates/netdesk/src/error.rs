//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use netdesk_config::ConfigError;
use netdesk_core::{CoreError, GENERIC_FAILURE};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the API at {url}")]
    #[diagnostic(
        code(netdesk::connection_failed),
        help(
            "Check that the API is reachable.\n\
             Reason: {reason}\n\
             Use --insecure (-k) for self-signed certificates, or set ca_cert in your profile."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(netdesk::auth_failed),
        help("Your token may have expired. Store a new one with: netdesk config set-token")
    )]
    AuthFailed { message: String },

    #[error("No API token configured for profile '{profile}'")]
    #[diagnostic(
        code(netdesk::no_credentials),
        help(
            "Configure credentials with: netdesk config init\n\
             Or set the NETDESK_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Access ───────────────────────────────────────────────────────
    #[error("Permission denied: requires {permission}")]
    #[diagnostic(
        code(netdesk::permission_denied),
        help("Run `netdesk permissions` to see what the active profile may do.")
    )]
    PermissionDenied { permission: String },

    #[error("Forbidden: {message}")]
    #[diagnostic(code(netdesk::forbidden))]
    Forbidden { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(netdesk::not_found),
        help("Run: netdesk {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{message}")]
    #[diagnostic(
        code(netdesk::rejected),
        help("Move the assigned users to another package first.")
    )]
    Rejected { message: String },

    #[error("{message}")]
    #[diagnostic(code(netdesk::conflict))]
    Conflict { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(netdesk::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(netdesk::validation))]
    Validation { field: String, reason: String },

    #[error("Package form is incomplete: {errors}")]
    #[diagnostic(
        code(netdesk::form_invalid),
        help("Pass the missing values as flags, or use --interactive to be prompted.")
    )]
    FormInvalid { errors: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(netdesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: netdesk config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(netdesk::no_config),
        help(
            "Create one with: netdesk config init\n\
             Or pass --api-url and --token.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(netdesk::config))]
    Config { message: String },

    #[error("Keyring error: {message}")]
    #[diagnostic(
        code(netdesk::keyring),
        help("Set token_env or token in the profile instead, or pass --token.")
    )]
    Keyring { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(netdesk::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out{}", .seconds.map(|s| format!(" after {s}s")).unwrap_or_default())]
    #[diagnostic(
        code(netdesk::timeout),
        help("Increase timeout with --timeout or check API responsiveness.")
    )]
    Timeout { seconds: Option<u64> },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(netdesk::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } | Self::Keyring { .. } => {
                exit_code::AUTH
            }
            Self::PermissionDenied { .. } | Self::Forbidden { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } | Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::FormInvalid { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let message = err.user_message();
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::AuthenticationFailed { .. } => CliError::AuthFailed { message },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::PermissionDenied { permission } => CliError::PermissionDenied {
                permission: permission.to_string(),
            },

            CoreError::Forbidden { .. } => CliError::Forbidden { message },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => {
                let resource_type = entity_type.to_lowercase();
                CliError::NotFound {
                    list_command: format!("{resource_type}s list"),
                    resource_type,
                    identifier,
                }
            }

            CoreError::Rejected { .. } => CliError::Rejected { message },

            CoreError::ValidationFailed(_) => CliError::FormInvalid { errors: message },

            CoreError::InvalidState { message } => CliError::Validation {
                field: "form".into(),
                reason: message,
            },

            CoreError::Api {
                status: Some(409), ..
            } => CliError::Conflict { message },

            CoreError::Api { code, .. } => CliError::ApiError {
                code: code.unwrap_or_default(),
                message,
            },

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Internal(detail) => {
                tracing::debug!(%detail, "internal error");
                CliError::ApiError {
                    code: "internal".into(),
                    message: GENERIC_FAILURE.into(),
                }
            }
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Keyring(e) => CliError::Keyring {
                message: e.to_string(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other @ (ConfigError::Serialization(_) | ConfigError::Figment(_)) => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
