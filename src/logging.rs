//! Tracing subscriber setup

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Level after applying `-v` flags on top of the configured one
#[must_use]
pub fn effective_level(configured: &str, verbosity: u8) -> &str {
    const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
    let base = LEVELS
        .iter()
        .position(|level| *level == configured)
        .unwrap_or(2);
    LEVELS[(base + usize::from(verbosity)).min(LEVELS.len() - 1)]
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the config.
pub fn init(config: &LoggingConfig, verbosity: u8) -> Result<()> {
    let level = effective_level(&config.level, verbosity);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("taxifare={level},tower_http={level}")));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    result.map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_level() {
        assert_eq!(effective_level("info", 0), "info");
        assert_eq!(effective_level("info", 1), "debug");
        assert_eq!(effective_level("warn", 5), "trace");
        assert_eq!(effective_level("bogus", 0), "info");
    }
}
