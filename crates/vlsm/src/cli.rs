//! Clap derive structures for the `vlsm` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// vlsm -- carve an IPv4 block into right-sized subnets
#[derive(Debug, Parser)]
#[command(
    name = "vlsm",
    version,
    about = "Carve an IPv4 block into right-sized subnets (VLSM)",
    long_about = "Allocate named host-count requirements into contiguous subnets of one\n\
        parent IPv4 block. Each requirement gets the smallest block that holds its\n\
        hosts plus network and broadcast addresses; blocks are packed largest first.",
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
    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "VLSM_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
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
    /// Allocate subnets for a set of host requirements
    #[command(alias = "alloc", alias = "a")]
    Allocate(AllocateArgs),

    /// Show the details of a single CIDR block
    #[command(alias = "i")]
    Inspect(InspectArgs),

    /// Manage CLI configuration and saved plans
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Allocate ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
#[command(after_help = "Examples:\n  \
    vlsm allocate 192.168.0.0/24 Sales=100 Ops=50 Lab=10\n  \
    vlsm allocate 10.0.0.0/16 500 120 30 -o json\n  \
    vlsm allocate --plan office --export vlsm_calculation.json")]
pub struct AllocateArgs {
    /// Parent block in CIDR notation (e.g. 192.168.0.0/24)
    pub parent: Option<String>,

    /// Subnet requirements as NAME=HOSTS, or bare HOSTS for an auto-generated name
    #[arg(value_name = "SUBNET")]
    pub subnets: Vec<String>,

    /// Take the parent and subnets from a saved plan
    #[arg(long)]
    pub plan: Option<String>,

    /// Read subnet requirements from a JSON or YAML file
    #[arg(long, short = 'f', value_name = "PATH")]
    pub from_file: Option<PathBuf>,

    /// Also write the allocated subnets to a JSON file
    #[arg(long, short = 'e', value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Render the full report (subnets, totals, error) instead of the subnet list
    #[arg(long)]
    pub report: bool,

    /// Save this request as a named plan in the config file
    #[arg(long, value_name = "NAME")]
    pub save: Option<String>,
}

// ── Inspect ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Block in CIDR notation (host bits are cleared)
    pub cidr: String,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a config file with a first plan, guided
    Init,

    /// Display the current configuration
    Show,

    /// Print the config file location
    Path,

    /// Set a configuration value (output, color, default_plan)
    Set {
        /// Config key
        key: String,

        /// Value to set
        value: String,
    },

    /// List saved plans
    Plans,

    /// Set the default plan
    Use {
        /// Plan name to set as default
        name: String,
    },

    /// Delete a saved plan
    Remove {
        /// Plan name to delete
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
