//! Tier Pairing - round-based skill-tiered 1v1 matchmaking
//!
//! This crate pairs an active roster into head-to-head matches each round,
//! grouping players into skill tiers, discouraging recent rematches and
//! rotating the sit-out player when the roster is odd. State that crosses
//! round boundaries is passed in and returned explicitly.

pub mod config;
pub mod error;
pub mod history;
pub mod metrics;
pub mod pairing;
pub mod rating;
pub mod tiers;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{PairingError, Result};
pub use types::*;

// Re-export key components
pub use history::{CarryOverState, CarryOverStore, JsonFileStore, MatchHistory};
pub use pairing::{Matchmaker, RoundOutcome};
pub use rating::{SkillModel, WengLinSkillModel};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
