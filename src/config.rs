//! Configuration management with validation and defaults
//!
//! Settings come from an optional TOML file, then `MINICASINO_*` environment
//! variables, then validation.

use crate::errors::{CasinoResult, ConfigurationError};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Top-level service configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CasinoConfig {
    pub engine: EngineConfig,
    pub catalog: CatalogConfig,
    pub registration: RegistrationConfig,
    pub monitoring: MonitoringConfig,
}

/// Betting engine timing and randomness
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Processing latency awaited after validation and before commit.
    /// Zero disables it.
    pub settle_delay_ms: u64,
    /// Upper bound on waiting for the user lock plus the settle delay
    pub bet_timeout_ms: u64,
    /// Fixed seed for reproducible outcomes; entropy-seeded when absent
    pub rng_seed: Option<u64>,
}

impl EngineConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn bet_timeout(&self) -> Duration {
        Duration::from_millis(self.bet_timeout_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 500,
            bet_timeout_ms: 15_000,
            rng_seed: None,
        }
    }
}

/// Game catalog seeding
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// TOML file of `[[games]]` tables. Built-in games are used when unset.
    pub games_file: Option<String>,
}

/// Registration rules
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    pub minimum_age: u32,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self { minimum_age: 18 }
    }
}

/// Logging configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub log_level: LogLevel,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive for `tracing_subscriber::EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

impl CasinoConfig {
    /// Configuration for tests and local runs: no settle delay, fixed seed
    pub fn instant(seed: u64) -> Self {
        Self {
            engine: EngineConfig {
                settle_delay_ms: 0,
                bet_timeout_ms: 5_000,
                rng_seed: Some(seed),
            },
            ..Default::default()
        }
    }
}

/// Configuration loader with environment variable support
#[derive(Default)]
pub struct ConfigLoader {
    config_path: Option<String>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Set the configuration file path
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Load configuration from file and environment variables
    pub fn load(&self) -> CasinoResult<CasinoConfig> {
        self.load_with(|key| env::var(key).ok())
    }

    /// Same as [`load`](Self::load) with an explicit variable lookup
    pub fn load_with<F>(&self, lookup: F) -> CasinoResult<CasinoConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match self.config_path {
            Some(ref path) => Self::load_from_file(path)?,
            None => CasinoConfig::default(),
        };

        Self::apply_overrides(&mut config, lookup)?;
        Self::validate(&config)?;

        Ok(config)
    }

    fn load_from_file(path: &str) -> CasinoResult<CasinoConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigurationError::LoadFailed(format!("Failed to read {}: {}", path, e))
        })?;

        toml::from_str(&content).map_err(|e| {
            ConfigurationError::LoadFailed(format!("Failed to parse TOML: {}", e)).into()
        })
    }

    fn apply_overrides<F>(config: &mut CasinoConfig, lookup: F) -> CasinoResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(delay) = lookup("MINICASINO_SETTLE_DELAY_MS") {
            config.engine.settle_delay_ms = parse_var("MINICASINO_SETTLE_DELAY_MS", delay)?;
        }
        if let Some(timeout) = lookup("MINICASINO_BET_TIMEOUT_MS") {
            config.engine.bet_timeout_ms = parse_var("MINICASINO_BET_TIMEOUT_MS", timeout)?;
        }
        if let Some(seed) = lookup("MINICASINO_RNG_SEED") {
            config.engine.rng_seed = Some(parse_var("MINICASINO_RNG_SEED", seed)?);
        }
        if let Some(file) = lookup("MINICASINO_GAMES_FILE") {
            config.catalog.games_file = Some(file);
        }
        if let Some(age) = lookup("MINICASINO_MINIMUM_AGE") {
            config.registration.minimum_age = parse_var("MINICASINO_MINIMUM_AGE", age)?;
        }
        if let Some(level) = lookup("MINICASINO_LOG_LEVEL") {
            config.monitoring.log_level = parse_var("MINICASINO_LOG_LEVEL", level)?;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(config: &CasinoConfig) -> CasinoResult<()> {
        if config.engine.bet_timeout_ms == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "engine.bet_timeout_ms".to_string(),
                value: "0".to_string(),
                reason: "Bet timeout cannot be zero".to_string(),
            }
            .into());
        }

        if config.engine.settle_delay_ms >= config.engine.bet_timeout_ms {
            return Err(ConfigurationError::ValidationFailed(format!(
                "engine.settle_delay_ms ({}) must be below engine.bet_timeout_ms ({})",
                config.engine.settle_delay_ms, config.engine.bet_timeout_ms
            ))
            .into());
        }

        if let Some(ref file) = config.catalog.games_file {
            if file.trim().is_empty() {
                return Err(ConfigurationError::InvalidValue {
                    field: "catalog.games_file".to_string(),
                    value: file.clone(),
                    reason: "Path cannot be blank".to_string(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Render a configuration as TOML
    pub fn render(config: &CasinoConfig) -> CasinoResult<String> {
        toml::to_string_pretty(config).map_err(|e| {
            ConfigurationError::LoadFailed(format!("Failed to serialize config: {}", e)).into()
        })
    }
}

fn parse_var<T: std::str::FromStr>(field: &str, value: String) -> CasinoResult<T> {
    value.trim().parse().map_err(|_| {
        ConfigurationError::InvalidValue {
            field: field.to_string(),
            value,
            reason: format!("Cannot parse as {}", std::any::type_name::<T>()),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = CasinoConfig::default();
        assert!(ConfigLoader::validate(&config).is_ok());
        assert_eq!(config.engine.settle_delay(), Duration::from_millis(500));
        assert_eq!(config.engine.bet_timeout(), Duration::from_secs(15));
        assert_eq!(config.registration.minimum_age, 18);
    }

    #[test]
    fn test_instant_config_is_valid() {
        let config = CasinoConfig::instant(7);
        assert!(ConfigLoader::validate(&config).is_ok());
        assert_eq!(config.engine.rng_seed, Some(7));
        assert_eq!(config.engine.settle_delay(), Duration::ZERO);
    }

    #[test]
    fn test_delay_must_fit_in_timeout() {
        let mut config = CasinoConfig::default();
        config.engine.settle_delay_ms = 20_000;
        let err = ConfigLoader::validate(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        config.engine.bet_timeout_ms = 0;
        assert!(ConfigLoader::validate(&config).is_err());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[engine]\nsettle_delay_ms = 5\nrng_seed = 42\n").unwrap();

        let config = ConfigLoader::new()
            .with_path(file.path())
            .load_with(no_env)
            .unwrap();

        assert_eq!(config.engine.settle_delay_ms, 5);
        assert_eq!(config.engine.rng_seed, Some(42));
        assert_eq!(config.engine.bet_timeout_ms, 15_000);
        assert_eq!(config.monitoring.log_level, LogLevel::Info);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("MINICASINO_SETTLE_DELAY_MS", "10"),
            ("MINICASINO_RNG_SEED", "99"),
            ("MINICASINO_MINIMUM_AGE", "21"),
            ("MINICASINO_LOG_LEVEL", "DEBUG"),
            ("MINICASINO_GAMES_FILE", "games.toml"),
        ]
        .into_iter()
        .collect();

        let config = ConfigLoader::new()
            .load_with(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.engine.settle_delay_ms, 10);
        assert_eq!(config.engine.rng_seed, Some(99));
        assert_eq!(config.registration.minimum_age, 21);
        assert_eq!(config.monitoring.log_level, LogLevel::Debug);
        assert_eq!(config.catalog.games_file.as_deref(), Some("games.toml"));
    }

    #[test]
    fn test_bad_env_value_is_rejected() {
        let result = ConfigLoader::new().load_with(|key| {
            (key == "MINICASINO_BET_TIMEOUT_MS").then(|| "soon".to_string())
        });

        match result {
            Err(crate::errors::CasinoError::Configuration(ConfigurationError::InvalidValue {
                field,
                value,
                ..
            })) => {
                assert_eq!(field, "MINICASINO_BET_TIMEOUT_MS");
                assert_eq!(value, "soon");
            }
            other => panic!("Expected invalid value error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_fails() {
        let result = ConfigLoader::new()
            .with_path("/definitely/not/here.toml")
            .load_with(no_env);
        assert!(result.is_err());
    }

    #[test]
    fn test_render_round_trips() {
        let original = CasinoConfig::instant(3);
        let rendered = ConfigLoader::render(&original).unwrap();
        let parsed: CasinoConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, original);
    }
}
