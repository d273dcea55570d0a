//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `AHP_STUDY` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment is a valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use ahp_study::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Aggregating with {}", config.engine.aggregation);
//! ```

mod engine;
mod error;
mod invitation;
mod logging;
mod storage;

pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use invitation::InvitationConfig;
pub use logging::LoggingConfig;
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Priority, consistency and aggregation settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Invitation token lifetime and code format
    #[serde(default)]
    pub invitation: InvitationConfig,

    /// Hierarchy snapshot location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log level and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `AHP_STUDY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `AHP_STUDY__ENGINE__AGGREGATION=vector` -> `engine.aggregation = vector`
    /// - `AHP_STUDY__INVITATION__TOKEN_TTL_HOURS=48` -> `invitation.token_ttl_hours = 48`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("AHP_STUDY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.engine.validate()?;
        self.invitation.validate()?;
        self.storage.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregation::AggregationStrategy;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 4] = [
        "AHP_STUDY__ENGINE__AGGREGATION",
        "AHP_STUDY__ENGINE__CONSISTENCY_THRESHOLD",
        "AHP_STUDY__INVITATION__TOKEN_TTL_HOURS",
        "AHP_STUDY__LOGGING__JSON",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config.engine, EngineConfig::default());
        assert_eq!(config.invitation.token_ttl_hours, 336);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn environment_overrides_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("AHP_STUDY__ENGINE__AGGREGATION", "vector");
        env::set_var("AHP_STUDY__ENGINE__CONSISTENCY_THRESHOLD", "0.2");
        env::set_var("AHP_STUDY__INVITATION__TOKEN_TTL_HOURS", "48");
        env::set_var("AHP_STUDY__LOGGING__JSON", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.engine.aggregation, AggregationStrategy::Vector);
        assert_eq!(config.engine.consistency_threshold, 0.2);
        assert_eq!(config.invitation.token_ttl_hours, 48);
        assert!(config.logging.json);
    }

    #[test]
    fn validate_reports_first_bad_section() {
        let mut config = AppConfig::default();
        config.invitation.token_ttl_hours = -1;
        assert_eq!(config.validate(), Err(ValidationError::InvalidTokenTtl));
    }
}
