//! Diagnostic logging setup.

use log::LevelFilter;

/// Wire up env_logger at the requested verbosity.
///
/// Timestamps are dropped so progress lines stay terse; a `RUST_LOG`
/// value in the environment still overrides the CLI level.
pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}
