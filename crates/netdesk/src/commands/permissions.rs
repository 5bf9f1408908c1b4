//! `netdesk permissions`: what the active profile may do.

use serde::Serialize;
use tabled::Tabled;

use netdesk_core::{Permission, PermissionSet};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct Grant {
    permission: Permission,
    granted: bool,
}

#[derive(Tabled)]
struct GrantRow {
    #[tabled(rename = "Permission")]
    permission: String,
    #[tabled(rename = "Granted")]
    granted: &'static str,
}

fn grants(granted: &PermissionSet) -> Vec<Grant> {
    PermissionSet::all()
        .iter()
        .map(|permission| Grant {
            permission,
            granted: granted.can(permission),
        })
        .collect()
}

pub fn handle(profile: &str, granted: &PermissionSet, global: &GlobalOpts) -> Result<(), CliError> {
    // Plain output lists granted tags only, for scripting.
    let out = if global.output == OutputFormat::Plain {
        granted
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        output::render_list(
            global.output,
            &grants(granted),
            |g| GrantRow {
                permission: g.permission.to_string(),
                granted: if g.granted { "yes" } else { "no" },
            },
            |g| g.permission.to_string(),
        )?
    };

    output::notice(&format!("Profile: {profile}"), global.quiet);
    output::print_output(&out, global.quiet);
    Ok(())
}
