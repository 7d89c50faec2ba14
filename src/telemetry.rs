use crate::config::MonitoringConfig;
use tracing_subscriber::EnvFilter;

/// Default filter directives when `RUST_LOG` is unset
pub fn default_directives(config: &MonitoringConfig) -> String {
    format!("minicasino={}", config.log_level.as_filter())
}

/// Install the global fmt subscriber. `RUST_LOG` takes precedence over the
/// configured level. Calling this twice is a no-op.
pub fn init_tracing(config: &MonitoringConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn test_default_directives_follow_level() {
        let config = MonitoringConfig {
            log_level: LogLevel::Debug,
        };
        assert_eq!(default_directives(&config), "minicasino=debug");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let config = MonitoringConfig::default();
        init_tracing(&config);
        init_tracing(&config);
    }
}
