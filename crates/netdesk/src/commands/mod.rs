//! Command dispatch: bridges CLI args -> console operations -> output.

pub mod config_cmd;
pub mod packages;
pub mod permissions;
pub mod routers;
pub mod util;

use netdesk_core::{Controller, PackageConsole, Session};

use crate::cli::{Command, GlobalOpts, RoutersArgs, RoutersCommand};
use crate::config::Resolved;
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    mut resolved: Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Command::Routers(RoutersArgs {
        command: RoutersCommand::List {
            page_size: Some(page_size),
        },
    }) = &cmd
    {
        resolved.console.router_page_size = *page_size;
    }

    let controller = Controller::new(resolved.console)?;
    let console = PackageConsole::new(controller, Session::new(resolved.permissions));
    tracing::debug!(profile = %resolved.profile_name, ?console, "console ready");

    match cmd {
        Command::Packages(args) => packages::handle(console, args, global).await,
        Command::Routers(args) => routers::handle(&console, args, global).await,
        // Handled before dispatch.
        Command::Permissions | Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
