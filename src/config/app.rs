//! Main application configuration
//!
//! This module defines the top-level configuration for the pairing tools,
//! including TOML file loading, environment variable overrides and validation.

use crate::config::{PairingConfig, TierConfig};
use crate::rating::ExtendedWengLinConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub storage: StorageSettings,
    pub matchmaking: MatchmakingConfig,
    pub rating: ExtendedWengLinConfig,
}

/// Process-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Name used in logs
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Where ratings, carry-over state and reports live on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub ratings_path: PathBuf,
    pub state_path: PathBuf,
    pub report_path: PathBuf,
}

/// Everything the matchmaker needs to run a round
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchmakingConfig {
    pub tiers: TierConfig,
    pub pairing: PairingConfig,
}

impl MatchmakingConfig {
    pub fn validate(&self) -> Result<()> {
        self.tiers.validate()?;
        self.pairing.validate()
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "tier-pairing".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            ratings_path: PathBuf::from("ratings.json"),
            state_path: PathBuf::from("pairing_state.json"),
            report_path: PathBuf::from("matches.json"),
        }
    }
}

fn env_override<T: FromStr>(key: &str) -> Result<Option<T>> {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("Invalid {} value: {}", key, value)),
        Err(_) => Ok(None),
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.apply_env_overrides()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        // Service settings
        if let Some(name) = env_override("SERVICE_NAME")? {
            self.service.name = name;
        }
        if let Some(log_level) = env_override("LOG_LEVEL")? {
            self.service.log_level = log_level;
        }

        // Storage settings
        if let Some(path) = env_override("RATINGS_PATH")? {
            self.storage.ratings_path = path;
        }
        if let Some(path) = env_override("STATE_PATH")? {
            self.storage.state_path = path;
        }
        if let Some(path) = env_override("REPORT_PATH")? {
            self.storage.report_path = path;
        }

        // Matchmaking settings
        if let Some(rounds) = env_override("LOOKBACK_ROUNDS")? {
            self.matchmaking.pairing.lookback_rounds = rounds;
        }
        if let Some(size) = env_override("MAX_TIER_SIZE")? {
            self.matchmaking.tiers.max_tier_size = size;
        }
        if let Some(penalty) = env_override("RECENCY_PENALTY")? {
            self.matchmaking.pairing.recency_penalty = Some(penalty);
        }
        if let Some(strategy) = env_override("PAIRING_STRATEGY")? {
            self.matchmaking.pairing.strategy = strategy;
        }
        if let Some(policy) = env_override("MISSING_RATING_POLICY")? {
            self.matchmaking.pairing.missing_rating = policy;
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.storage.ratings_path.as_os_str().is_empty() {
        return Err(anyhow!("Ratings path cannot be empty"));
    }
    if config.storage.state_path.as_os_str().is_empty() {
        return Err(anyhow!("State path cannot be empty"));
    }

    config.matchmaking.validate()?;
    config.rating.validate()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PairingStrategy;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = AppConfig::default();
        config.service.log_level = "loud".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [matchmaking.pairing]
            strategy = "tier_naive"
            lookback_rounds = 5

            [matchmaking.tiers]
            max_tier_size = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.matchmaking.pairing.strategy, PairingStrategy::TierNaive);
        assert_eq!(config.matchmaking.pairing.lookback_rounds, 5);
        assert_eq!(config.matchmaking.tiers.max_tier_size, 4);
        assert_eq!(config.matchmaking.tiers.default_width, 3.0);
        assert_eq!(config.service.log_level, "info");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_rating_section_from_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [rating]
            initial_rating = 30.0
            "#,
        )
        .unwrap();

        let rating = config.rating.clone();
        assert_eq!(rating.initial_rating, 30.0);
        assert_eq!(rating.initial_uncertainty, 25.0 / 3.0);
        assert_eq!(rating.weng_lin_config.beta, 25.0 / 6.0);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_nested_config_rejected() {
        let mut config = AppConfig::default();
        config.matchmaking.pairing.lookback_rounds = 0;
        assert!(validate_config(&config).is_err());
    }
}
