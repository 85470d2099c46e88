//! Structured logging configured from [`CliConfig`].
//!
//! Logs go to stderr so that reports written to stdout stay clean. The
//! subscriber also forwards `log` records, which is how the `corejet`
//! library reports skipped lines and ignored report values.

use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

fn filter_from_config(config: &CliConfig) -> EnvFilter {
    EnvFilter::new(config.log_level.as_filter_str())
}

/// Initialise the logging subsystem based on configuration.
///
/// Log level precedence (highest to lowest):
///
/// 1. CLI `--log-level`
/// 2. `COREJET_LOG_LEVEL`
/// 3. `warn`
///
/// If a global subscriber is already set the call does nothing.
pub fn init_logging(config: &CliConfig) {
    let filter = filter_from_config(config);

    // The first subscriber wins; later calls (e.g. from tests) are ignored.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time()
        .try_init();
}
