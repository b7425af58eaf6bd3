//! Command line surface and process exit codes.

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Exit code when the rendered image cannot be saved.
pub const EXIT_FAIL_SAVE: i32 = 1;

/// Exit code when the scene cannot be loaded.
pub const EXIT_FAIL_LOAD: i32 = 2;

/// Exit code for bad command line arguments.
pub const EXIT_BAD_ARGS: i32 = 3;

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Errors and warnings.
    Warn,
    /// Normal progress output.
    Info,
    /// Verbose debugging output.
    Debug,
    /// Everything.
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Parser)]
#[command(name = "caustica")]
#[command(about = "A Whitted-style ray tracer with photon-mapped caustics")]
pub struct Args {
    /// Scene file to render
    #[arg(short, long, default_value = "world.yml")]
    pub scene: String,

    /// PNG output path
    #[arg(short, long, default_value = "output.png")]
    pub output: String,

    /// Number of render worker threads
    #[arg(short = 'j', long, default_value = "1")]
    pub threads: usize,

    /// Report render progress from the first worker
    #[arg(long)]
    pub progress: bool,

    /// Print the scene file format reference and exit
    #[arg(long)]
    pub scene_help: bool,

    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,
}
