//! Configuration management for the pairing engine
//!
//! This module handles configuration loading from TOML files and environment
//! variables, validation, and default values.

pub mod app;
pub mod pairing;
pub mod tiers;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, MatchmakingConfig, ServiceSettings, StorageSettings};
pub use pairing::{MissingRatingPolicy, PairingConfig, PairingStrategy, TierPenaltyTable};
pub use tiers::{TierConfig, DEFAULT_TIER_LABELS};
