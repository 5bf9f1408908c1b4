//! Clap derive structures for the `netdesk` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Also
//! compiled by build.rs for man pages, so it may only depend on clap.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// netdesk -- service package console for ISP operators
#[derive(Debug, Parser)]
#[command(
    name = "netdesk",
    version,
    about = "Manage ISP service packages from the command line",
    long_about = "Administer Hotspot and PPPoE service packages: list, inspect,\n\
        create, edit, activate/deactivate and delete them, and see which\n\
        routers they earn revenue through.\n\n\
        Actions are offered according to the permissions granted to the\n\
        active profile.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Profile to use
    #[arg(long, short = 'p', env = "NETDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, short = 'u', env = "NETDESK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Bearer token (overrides profile, env and keyring)
    #[arg(long, env = "NETDESK_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NETDESK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "NETDESK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "NETDESK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage service packages
    #[command(alias = "pkg")]
    Packages(PackagesArgs),

    /// View routers
    Routers(RoutersArgs),

    /// Show the permissions granted to the active profile
    #[command(alias = "perms")]
    Permissions,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PACKAGES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PackagesArgs {
    #[command(subcommand)]
    pub command: PackagesCommand,
}

#[derive(Debug, Subcommand)]
pub enum PackagesCommand {
    /// List packages
    #[command(alias = "ls")]
    List {
        /// Only show packages of this kind
        #[arg(long = "type", short = 't')]
        kind: Option<PackageKind>,
    },

    /// Show a package with its statistics and allowed actions
    Get {
        /// Package ID
        id: String,
    },

    /// Create a package
    Create {
        /// Package kind
        kind: PackageKind,

        #[command(flatten)]
        fields: PackageFields,

        /// Prompt for every field
        #[arg(long, short = 'i')]
        interactive: bool,
    },

    /// Edit a package; omitted fields keep their current values
    #[command(alias = "edit")]
    Update {
        /// Package ID
        id: String,

        #[command(flatten)]
        fields: PackageFields,

        /// Prompt for every field, pre-filled with current values
        #[arg(long, short = 'i')]
        interactive: bool,
    },

    /// Activate or deactivate a package
    Toggle {
        /// Package ID
        id: String,
    },

    /// Delete a package
    #[command(alias = "rm")]
    Delete {
        /// Package ID
        id: String,
    },

    /// Show client counts and revenue for a package
    Stats {
        /// Package ID
        id: String,
    },

    /// Show revenue per router for a package
    Revenue {
        /// Package ID
        id: String,
    },
}

/// Form inputs shared by `create` and `update`. Values are taken as typed
/// and validated together before anything is sent.
#[derive(Debug, Default, Args)]
pub struct PackageFields {
    /// Display name
    #[arg(long)]
    pub name: Option<String>,

    /// Price
    #[arg(long)]
    pub price: Option<String>,

    /// Download speed in Mbps
    #[arg(long)]
    pub download: Option<String>,

    /// Upload speed in Mbps
    #[arg(long)]
    pub upload: Option<String>,

    /// Session length (Hotspot only)
    #[arg(long)]
    pub session_time: Option<String>,

    /// Unit of --session-time
    #[arg(long)]
    pub session_unit: Option<SessionUnit>,

    /// Data cap (Hotspot only)
    #[arg(long, conflicts_with = "no_data_limit")]
    pub data_limit: Option<String>,

    /// Unit of --data-limit
    #[arg(long)]
    pub data_unit: Option<DataUnit>,

    /// Remove the data cap (Hotspot only)
    #[arg(long)]
    pub no_data_limit: bool,

    /// Restrict to a router; repeat for several (Hotspot only)
    #[arg(long = "router", value_name = "ROUTER_ID", conflicts_with = "all_routers")]
    pub routers: Vec<String>,

    /// Clear the router restriction (Hotspot only)
    #[arg(long)]
    pub all_routers: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PackageKind {
    Hotspot,
    Pppoe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SessionUnit {
    Minutes,
    Hours,
    Days,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DataUnit {
    Mb,
    Gb,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ROUTERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RoutersArgs {
    #[command(subcommand)]
    pub command: RoutersCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoutersCommand {
    /// List routers
    #[command(alias = "ls")]
    List {
        /// Routers requested per page (overrides profile)
        #[arg(long)]
        page_size: Option<u32>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display the current configuration
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store the active profile's API token in the system keyring
    SetToken,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
