//! Error types for the minicasino betting core
//!
//! Every failure is a typed value returned at the point of detection. Nothing
//! is mutated before an error is returned.

use std::time::Duration;

/// Root error type for all minicasino operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CasinoError {
    /// Malformed input: non-positive stake, stake outside game limits,
    /// bad registration or deposit data, invalid game definition
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unknown username or game identifier
    #[error("Not found: {0}")]
    NotFound(String),

    /// Balance below the requested stake
    #[error("Insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: f64, requested: f64 },

    /// Username already registered
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Caller is not allowed to perform the operation (e.g. under age)
    #[error("Not permitted: {0}")]
    NotPermitted(String),

    /// Bet did not commit within the configured bound
    #[error("Bet for '{username}' not settled within {}ms", .after.as_millis())]
    Timeout { username: String, after: Duration },

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Fieldless classification of [`CasinoError`] for callers that map failures
/// onto their own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    InsufficientFunds,
    AlreadyExists,
    NotPermitted,
    Timeout,
    Configuration,
}

impl CasinoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CasinoError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            CasinoError::NotFound(_) => ErrorKind::NotFound,
            CasinoError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            CasinoError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            CasinoError::NotPermitted(_) => ErrorKind::NotPermitted,
            CasinoError::Timeout { .. } => ErrorKind::Timeout,
            CasinoError::Configuration(_) => ErrorKind::Configuration,
        }
    }

    pub(crate) fn user_not_found(username: &str) -> Self {
        CasinoError::NotFound(format!("user '{}'", username))
    }
}

/// Configuration and validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),
}

impl From<toml::de::Error> for CasinoError {
    fn from(e: toml::de::Error) -> Self {
        CasinoError::Configuration(ConfigurationError::LoadFailed(e.to_string()))
    }
}

// Convenience type alias for Results
pub type CasinoResult<T> = Result<T, CasinoError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_display() {
        let config_error = ConfigurationError::ValidationFailed("test".to_string());
        let casino_error = CasinoError::Configuration(config_error);

        assert!(casino_error.to_string().contains("Configuration error"));
        assert!(casino_error.to_string().contains("test"));
    }

    #[test]
    fn test_insufficient_funds_details() {
        let error = CasinoError::InsufficientFunds {
            balance: 5.0,
            requested: 10.0,
        };

        assert!(error.to_string().contains("balance 5"));
        assert!(error.to_string().contains("requested 10"));
        assert_eq!(error.kind(), ErrorKind::InsufficientFunds);
    }

    #[test]
    fn test_timeout_display() {
        let error = CasinoError::Timeout {
            username: "bo123".to_string(),
            after: Duration::from_millis(1500),
        };

        assert_eq!(error.to_string(), "Bet for 'bo123' not settled within 1500ms");
        assert_eq!(error.kind(), ErrorKind::Timeout);
    }

    #[test]
    fn test_error_conversion() {
        let config_error = ConfigurationError::LoadFailed("boom".to_string());
        let casino_error: CasinoError = config_error.into();

        assert_eq!(casino_error.kind(), ErrorKind::Configuration);
        assert!(casino_error.source().is_some());
    }

    #[test]
    fn test_user_not_found_kind() {
        let error = CasinoError::user_not_found("ghost");
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert!(error.to_string().contains("ghost"));
    }
}
