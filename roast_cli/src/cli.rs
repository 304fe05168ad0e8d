//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "roast", version, about = "Roast-curve analytics CLI")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/roast_config.toml")]
    pub config: PathBuf,

    /// Print results and logs as JSON instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Log level (error|warn|info|debug|trace); overrides [logging].level
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recompute ROR, milestones and phases of a saved roast profile
    Analyze {
        /// Roast profile JSON
        #[arg(long, value_name = "FILE")]
        profile: PathBuf,
        /// Reference profile to compare phases against
        #[arg(long, value_name = "FILE")]
        ghost: Option<PathBuf>,
    },
    /// Record a simulated roast in accelerated time
    Simulate {
        /// Stop after this many simulated seconds
        #[arg(long, value_name = "SECS", default_value_t = 900)]
        seconds: u64,
        /// Preheat seconds before the beans are charged
        #[arg(long, value_name = "SECS", default_value_t = 30)]
        charge_at: i64,
        /// Roast seconds after charge at which the beans are dropped
        #[arg(long, value_name = "SECS", default_value_t = 600)]
        drop_at: i64,
        /// Keep recording this long after DROP is detected
        #[arg(long, value_name = "SECS", default_value_t = 10)]
        post_drop: i64,
        /// Reading jitter amplitude in degrees
        #[arg(long, value_name = "DEG", default_value_t = 0.0)]
        noise: f64,
        /// Seed for the reading jitter
        #[arg(long, default_value_t = 1)]
        seed: u32,
        /// Save the recorded roast as a profile JSON
        #[arg(long, value_name = "FILE")]
        save: Option<PathBuf>,
    },
    /// Validate the config and report ok
    SelfCheck,
}
