//! tracing-subscriber setup. Logs go to stderr so stdout only carries the
//! summary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use transposer_core::config::LoggingConfig;

/// Installs the global subscriber.
///
/// Level precedence: `RUST_LOG`, then `--verbose`, then the config file.
pub fn init(config: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);
    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "compact" {
        registry.with(fmt_layer.compact()).init();
    } else {
        registry.with(fmt_layer).init();
    }
}
