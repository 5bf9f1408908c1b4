// ── Runtime connection configuration ──
//
// Describes how to reach the package API. Carries credentials and
// transport tuning but never touches disk; the CLI builds a
// `ConsoleConfig` from its profile and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Credentials sent with every request.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// `Authorization: Bearer <token>`.
    BearerToken(SecretString),
    /// No auth header (local development backends).
    None,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Default page size for the router multi-select.
pub const DEFAULT_ROUTER_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// API base URL, e.g. `https://isp.example.com/api`.
    pub url: Url,
    pub auth: AuthCredentials,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// Page size used when fetching routers for the form.
    pub router_page_size: u32,
}

impl ConsoleConfig {
    pub fn new(url: Url, auth: AuthCredentials) -> Self {
        Self {
            url,
            auth,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            router_page_size: DEFAULT_ROUTER_PAGE_SIZE,
        }
    }
}
