//! Router command handlers.

use tabled::Tabled;

use netdesk_core::{Controller, PackageConsole, Permission, Router, RouterDirectory};

use crate::cli::{GlobalOpts, RoutersArgs, RoutersCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct RouterRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
}

impl From<&Router> for RouterRow {
    fn from(r: &Router) -> Self {
        Self {
            id: r.id.to_string(),
            name: r.name.clone(),
            ip: r.ip_address.map_or_else(|| "-".into(), |ip| ip.to_string()),
        }
    }
}

/// The page size override is applied to the console config before the
/// controller is built.
pub async fn handle(
    console: &PackageConsole<Controller>,
    args: RoutersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RoutersCommand::List { .. } => {
            console.require(Permission::RoutersView)?;
            let spinner = output::spinner("Fetching routers", global);
            let routers = console.backend().list_routers().await;
            spinner.finish_and_clear();

            let out = output::render_list(
                global.output,
                &routers?,
                |r| RouterRow::from(r),
                |r| r.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
