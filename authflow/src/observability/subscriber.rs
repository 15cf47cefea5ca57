//! Subscriber installation.

use crate::config::LoggerConfig;
use tracing_subscriber::EnvFilter;

/// Initializes the global `tracing` subscriber.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Safe to call
/// multiple times; later calls are no-ops.
pub fn init_tracing(config: &LoggerConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    // try_init fails if a subscriber is already installed.
    let _ = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_noop() {
        init_tracing(&LoggerConfig::default());
        init_tracing(&LoggerConfig {
            json: true,
            ..LoggerConfig::default()
        });
    }
}
