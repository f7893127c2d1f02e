//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Bag Deskew - motion compensation for recorded rotating-lidar logs
#[derive(Parser, Debug)]
#[command(
    name = "bag-deskew",
    author,
    version,
    about = "Offline lidar bag deskew converter",
    long_about = "Replays a recorded sensor log, replaces raw rotating-lidar scans with\n\
                  motion-compensated point clouds anchored at the scan reference time,\n\
                  and copies every other configured topic through unchanged."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "BAG_DESKEW_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "BAG_DESKEW_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a recorded bag file
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "config.toml",
        env = "BAG_DESKEW_CONFIG"
    )]
    pub config: PathBuf,

    /// Input bag file to convert
    #[arg(short, long, env = "BAG_DESKEW_INPUT")]
    pub input: PathBuf,

    /// Output bag file to write
    #[arg(short, long, env = "BAG_DESKEW_OUTPUT")]
    pub output: PathBuf,

    /// Override scan topic from configuration
    #[arg(long, env = "BAG_DESKEW_SCAN_TOPIC")]
    pub scan_topic: Option<String>,

    /// Override sensor time offset (seconds) from configuration
    #[arg(long, env = "BAG_DESKEW_TIME_OFFSET")]
    pub sensor_time_offset: Option<f64>,

    /// Maximum number of input messages to process (0 = unlimited)
    #[arg(long, default_value = "0", env = "BAG_DESKEW_MAX_MESSAGES")]
    pub max_messages: u64,

    /// Validate configuration and exit without converting
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "BAG_DESKEW_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
