//! Error types for the pairing engine
//!
//! Fallible operations return `anyhow::Result`; the typed cases callers may
//! want to match on are collected in [`PairingError`].

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific pairing scenarios
#[derive(Debug, thiserror::Error)]
pub enum PairingError {
    #[error("Duplicate player in roster: {player_id}")]
    DuplicatePlayer { player_id: String },

    #[error("No rating available for player: {player_id}")]
    UnknownPlayer { player_id: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Invalid match outcome: {reason}")]
    InvalidOutcome { reason: String },
}
