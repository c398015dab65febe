//! Tracing setup for Recut binaries.
//!
//! Logs go to stderr so that commands printing machine-readable output on
//! stdout (`recut map --json`) stay parseable.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Crate targets raised to `debug` by the verbose flag.
const RECUT_TARGETS: &[&str] = &[
    "recut",
    "recut_common",
    "recut_project_model",
    "recut_timeline_core",
];

/// Filter directives for the configured level, widened when `verbose` is set.
pub fn filter_directives(config: &LoggingConfig, verbose: bool) -> String {
    if !verbose {
        return config.level.clone();
    }
    let mut directives: Vec<String> = vec![config.level.clone()];
    directives.extend(RECUT_TARGETS.iter().map(|target| format!("{target}=debug")));
    directives.join(",")
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Returns `false`
/// when a subscriber was already installed.
pub fn init_logging(config: &LoggingConfig, verbose: bool) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(config, verbose)));

    let installed = if config.json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(verbose)
            .without_time()
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };
    installed.is_ok()
}
