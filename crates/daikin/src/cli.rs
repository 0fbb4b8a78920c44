//! Clap derive structures for the `daikin` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Depends only on clap so `build.rs` can include it for man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// daikin -- control Daikin Wi-Fi air conditioners
#[derive(Debug, Parser)]
#[command(
    name = "daikin",
    version,
    about = "Control Daikin Wi-Fi air conditioners from the command line",
    long_about = "Reads and changes the state of Daikin air conditioners through\n\
        their local Wi-Fi adapter. Devices come from the config file or\n\
        from --device flags.",
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
    /// Adapter address or configured name (repeatable, replaces configured devices)
    #[arg(
        long = "device",
        short = 'd',
        env = "DAIKIN_DEVICE",
        value_delimiter = ',',
        global = true
    )]
    pub devices: Vec<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "DAIKIN_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "DAIKIN_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the current state of each device
    #[command(alias = "st")]
    Status,

    /// Show adapter identity (name, MAC, type)
    Info,

    /// Change a setting on every selected device
    Set(SetArgs),

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SET
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SetArgs {
    #[command(subcommand)]
    pub command: SetCommand,
}

#[derive(Debug, Subcommand)]
pub enum SetCommand {
    /// Turn the unit on or off
    Power { state: Toggle },

    /// Select the operating mode
    Mode { mode: ModeArg },

    /// Cooling set point in °C (clamped to 18-32)
    CoolTemp {
        #[arg(allow_negative_numbers = true)]
        celsius: f64,
    },

    /// Heating set point in °C (clamped to 10-30)
    HeatTemp {
        #[arg(allow_negative_numbers = true)]
        celsius: f64,
    },

    /// Fan step: 1 = night, 2-6 = speeds 1-5, anything else = auto
    Fan { step: u8 },

    /// Enable or disable vertical swing
    Swing { state: Toggle },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Auto,
    Heat,
    Cool,
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
    /// Print the config file location
    Path,

    /// Display current resolved configuration
    Show,

    /// Add a device to the config file
    AddDevice {
        /// Adapter host or host:port
        address: String,

        /// Display label
        #[arg(long, short = 'n')]
        name: Option<String>,
    },

    /// Remove a device from the config file
    RemoveDevice {
        /// Adapter address as configured
        address: String,
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
