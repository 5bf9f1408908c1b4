//! CLI configuration: thin wrapper around `netdesk_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--api-url, --token, --insecure, --timeout).

use std::time::Duration;

use secrecy::SecretString;

use netdesk_core::{AuthCredentials, ConsoleConfig, PermissionSet, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use netdesk_config::{Config, Profile, config_path, load_config, save_config};

/// Everything a controller-bound command needs.
#[derive(Debug)]
pub struct Resolved {
    pub profile_name: String,
    pub console: ConsoleConfig,
    pub permissions: PermissionSet,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Build the console configuration and granted permissions from the
/// config file, the active profile, and CLI overrides.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        let console = resolve_profile(profile, &profile_name, &cfg, global)?;
        let permissions = netdesk_config::resolve_permissions(profile)?;
        return Ok(Resolved {
            profile_name,
            console,
            permissions,
        });
    }

    // An explicitly requested profile must exist.
    if global.profile.is_some() {
        return Err(profile_not_found(profile_name, &cfg));
    }

    // No profile -- build from flags / env vars alone.
    let raw_url = global.api_url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let url = netdesk_config::parse_api_url(raw_url)?;

    let token = global.token.as_ref().ok_or_else(|| CliError::NoCredentials {
        profile: profile_name.clone(),
    })?;

    let tls = if global.insecure || cfg.defaults.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    };

    let mut console = ConsoleConfig::new(
        url,
        AuthCredentials::BearerToken(SecretString::from(token.clone())),
    );
    console.tls = tls;
    console.timeout = Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout));

    Ok(Resolved {
        profile_name,
        console,
        permissions: PermissionSet::all(),
    })
}

/// Granted permissions only. Needs no token.
pub fn resolve_permissions(global: &GlobalOpts) -> Result<(String, PermissionSet), CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);
    match cfg.profiles.get(&profile_name) {
        Some(profile) => Ok((
            profile_name,
            netdesk_config::resolve_permissions(profile)?,
        )),
        None if global.profile.is_some() => Err(profile_not_found(profile_name, &cfg)),
        None => Ok((profile_name, PermissionSet::all())),
    }
}

/// Translate a `Profile` + global flags into a `ConsoleConfig`.
///
/// CLI flag overrides take priority over profile values.
fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<ConsoleConfig, CliError> {
    // 1. URL (flag > env > profile)
    let raw_url = global.api_url.as_deref().unwrap_or(&profile.api_url);
    let url = netdesk_config::parse_api_url(raw_url)?;

    // 2. Token (flag > profile chain)
    let token = match global.token {
        Some(ref token) => SecretString::from(token.clone()),
        None => netdesk_config::resolve_token(profile, profile_name)?,
    };

    // 3. TLS verification
    let tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        netdesk_config::resolve_tls(profile, &cfg.defaults)
    };

    // 4. Timeout (flag > profile > defaults)
    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(cfg.defaults.timeout);

    Ok(ConsoleConfig {
        url,
        auth: AuthCredentials::BearerToken(token),
        tls,
        timeout: Duration::from_secs(timeout),
        router_page_size: profile.router_page_size,
    })
}

pub fn profile_not_found(name: String, cfg: &Config) -> CliError {
    let available = if cfg.profiles.is_empty() {
        "(none)".to_owned()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    };
    CliError::ProfileNotFound { name, available }
}
