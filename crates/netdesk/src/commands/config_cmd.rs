//! Config subcommand handlers.

use dialoguer::{Input, MultiSelect, Select};

use netdesk_core::{Permission, PermissionSet};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

// ── Helpers ─────────────────────────────────────────────────────────

/// Replace stored secrets so the config can be shown safely.
fn redact(cfg: &mut Config) {
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some("****".into());
        }
    }
}

/// Offer keyring storage for a token. Returns the value to keep in the
/// config file, or `None` when the keyring took it.
fn prompt_token_storage(profile_name: &str, token: String) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the token?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        netdesk_config::store_token(profile_name, &token)?;
        eprintln!("   ✓ Token stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(token))
    }
}

/// Pick granted permissions. Selecting everything stores nothing, which
/// means "the whole vocabulary".
fn prompt_permissions() -> Result<Option<Vec<String>>, CliError> {
    let all: Vec<Permission> = PermissionSet::all().iter().collect();
    let labels: Vec<String> = all.iter().map(ToString::to_string).collect();
    let picked = MultiSelect::new()
        .with_prompt("Granted permissions")
        .items(&labels)
        .defaults(&vec![true; labels.len()])
        .interact()
        .map_err(prompt_err)?;

    if picked.len() == all.len() {
        return Ok(None);
    }
    Ok(Some(
        picked
            .into_iter()
            .filter_map(|i| labels.get(i).cloned())
            .collect(),
    ))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("netdesk -- configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let api_url: String = Input::new()
                .with_prompt("API URL")
                .default("https://isp.example.com/api".into())
                .interact_text()
                .map_err(prompt_err)?;
            netdesk_config::parse_api_url(&api_url)?;

            let token = rpassword::prompt_password("API token: ").map_err(prompt_err)?;
            if token.is_empty() {
                return Err(CliError::Validation {
                    field: "token".into(),
                    reason: "token cannot be empty".into(),
                });
            }
            let token = prompt_token_storage(&profile_name, token)?;

            let mut profile = Profile::new(api_url);
            profile.token = token;
            profile.permissions = prompt_permissions()?;

            let mut cfg = config::load_config()?;
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());
            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: netdesk packages list");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let mut cfg = config::load_config()?;
            redact(&mut cfg);
            let out = output::render_single(
                global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|e| format!("# unrenderable: {e}")),
                |_| config::config_path().display().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config()?;
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: netdesk config init");
            } else {
                for name in cfg.profiles.keys() {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;
            if !cfg.profiles.contains_key(&name) {
                return Err(config::profile_not_found(name, &cfg));
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::notice(&format!("✓ Default profile set to '{name}'"), global.quiet);
            Ok(())
        }

        // ── SetToken ────────────────────────────────────────────────
        ConfigCommand::SetToken => {
            let cfg = config::load_config()?;
            let profile_name = config::active_profile_name(global, &cfg);
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(config::profile_not_found(profile_name, &cfg));
            }

            let token = rpassword::prompt_password("API token: ").map_err(prompt_err)?;
            if token.is_empty() {
                return Err(CliError::Validation {
                    field: "token".into(),
                    reason: "token cannot be empty".into(),
                });
            }
            netdesk_config::store_token(&profile_name, &token)?;
            output::notice(
                &format!("✓ Token stored in system keyring for profile '{profile_name}'"),
                global.quiet,
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_masks_plaintext_tokens() {
        let mut cfg = Config::default();
        let mut profile = Profile::new("https://isp.example.com/api");
        profile.token = Some("secret".into());
        cfg.profiles.insert("default".into(), profile);
        cfg.profiles
            .insert("env".into(), Profile::new("https://isp.example.com/api"));

        redact(&mut cfg);
        assert_eq!(cfg.profiles["default"].token.as_deref(), Some("****"));
        assert!(cfg.profiles["env"].token.is_none());
    }
}
