//! Clap derive structures for the `merakidns` CLI.
//!
//! Shared with build.rs for man page generation, so this file must only
//! depend on clap and clap_complete.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// merakidns -- bulk DNS changes for Meraki static-IP devices
#[derive(Debug, Parser)]
#[command(
    name = "merakidns",
    version,
    about = "Push DNS servers to every static-IP device in a Meraki network",
    long_about = "Resolve an organization and a network by name fragment, find the\n\
        devices whose primary uplink (WAN1) uses static addressing, and rewrite\n\
        their DNS servers through the Meraki Dashboard API v1.\n\n\
        Name fragments are case-sensitive substrings; when several names match,\n\
        the last one in the dashboard's listing order is used.",
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
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "MERAKIDNS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Dashboard API key
    #[arg(
        long,
        env = "MERAKI_DASHBOARD_API_KEY",
        global = true,
        hide_env_values = true
    )]
    pub api_key: Option<String>,

    /// Dashboard API base URL (overrides profile)
    #[arg(long, env = "MERAKIDNS_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Output format [default: table, or the config file's default]
    #[arg(long, short = 'o', env = "MERAKIDNS_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Skip TLS certificate verification
    #[arg(long, short = 'k', env = "MERAKIDNS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "MERAKIDNS_TIMEOUT", global = true)]
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
    /// List organizations visible to the API key
    #[command(alias = "org")]
    Orgs(OrgsArgs),

    /// List networks of an organization
    #[command(alias = "net", alias = "n")]
    Networks(NetworksArgs),

    /// List devices and check serial membership
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Validate addresses and push DNS servers to devices
    Dns(DnsArgs),

    /// Interactive key → organization → network → DNS flow
    Wizard,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared selectors ─────────────────────────────────────────────────

#[derive(Debug, Clone, Args)]
pub struct OrgSelector {
    /// Organization name fragment (case-sensitive; last match wins)
    #[arg(long)]
    pub org: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct NetworkSelector {
    /// Organization name fragment (case-sensitive; last match wins)
    #[arg(long)]
    pub org: Option<String>,

    /// Network name fragment (case-sensitive; last match wins)
    #[arg(long)]
    pub network: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct DnsServers {
    /// Primary DNS server (first slot)
    #[arg(long, visible_alias = "dns1")]
    pub primary: Option<String>,

    /// Secondary DNS server (second slot)
    #[arg(long, visible_alias = "dns2")]
    pub secondary: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ORGS / NETWORKS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct OrgsArgs {
    #[command(subcommand)]
    pub command: OrgsCommand,
}

#[derive(Debug, Subcommand)]
pub enum OrgsCommand {
    /// List organizations
    #[command(alias = "ls")]
    List,
}

#[derive(Debug, Args)]
pub struct NetworksArgs {
    #[command(subcommand)]
    pub command: NetworksCommand,
}

#[derive(Debug, Subcommand)]
pub enum NetworksCommand {
    /// List the networks of an organization
    #[command(alias = "ls")]
    List(OrgSelector),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEVICES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List the devices of a network
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        target: NetworkSelector,

        /// Only devices whose WAN1 uses static addressing
        #[arg(long)]
        static_only: bool,
    },

    /// Check that a serial belongs to an organization (and optionally a network)
    Check {
        /// Device serial number
        serial: String,

        #[command(flatten)]
        target: NetworkSelector,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DNS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DnsArgs {
    #[command(subcommand)]
    pub command: DnsCommand,
}

#[derive(Debug, Subcommand)]
pub enum DnsCommand {
    /// Check that addresses are dotted-quad IPv4 (offline)
    Check {
        /// Addresses to check
        #[arg(required = true)]
        addresses: Vec<String>,
    },

    /// Set DNS on every static-IP device of a network
    Set {
        #[command(flatten)]
        target: NetworkSelector,

        #[command(flatten)]
        servers: DnsServers,

        /// Show which devices would change without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Set DNS on a single device
    SetDevice {
        /// Device serial number
        serial: String,

        #[command(flatten)]
        servers: DnsServers,
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
    /// Create a profile with guided setup
    Init,

    /// Display the configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,

    /// Set a value on the active profile
    Set {
        /// Profile key (base_url, organization, network, api_key_env, ca_cert, insecure, timeout)
        key: String,

        /// Value to set
        value: String,
    },

    /// Store the active profile's API key in the system keyring
    SetKey,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
