//! Logging setup
//!
//! `RUST_LOG` wins over the configured level. Output goes to stderr so that
//! stdout stays free for the run summary.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init(log_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(log_level)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .ok();
}

fn default_filter(log_level: &str) -> String {
    // HTTP internals are noisy at debug
    format!("{log_level},hyper=warn,reqwest=warn")
}
