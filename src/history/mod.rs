//! Match history and carry-over state
//!
//! This module holds the rolling window of recent pairings and the storage
//! interface for the state that crosses round boundaries.

pub mod store;
pub mod window;

pub use store::{CarryOverState, CarryOverStore, InMemoryStore, JsonFileStore, LoadedState};
pub use window::{MatchHistory, ASSUMED_ROUND_SIZE, DEFAULT_LOOKBACK_ROUNDS};
