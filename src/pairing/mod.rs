//! Round pairing
//!
//! Cost function, odd-player carry-over policy, the greedy engine and the
//! matchmaker that runs them in order for one round.

pub mod carry_over;
pub mod cost;
pub mod engine;
pub mod matchmaker;

pub use carry_over::{CarryOverDecision, CarryOverPolicy};
pub use cost::PairingCostFunction;
pub use engine::GreedyPairingEngine;
pub use matchmaker::{Matchmaker, RoundOutcome};
