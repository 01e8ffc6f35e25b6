//! Rolling window of recent pairings
//!
//! Round boundaries are not tracked. The window keeps
//! `lookback_rounds * ASSUMED_ROUND_SIZE` pairings, which only equals
//! "the last N rounds" when rounds really have that many matches.

use crate::types::{HistoricalPairing, Match};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pairings per round assumed when sizing the window
pub const ASSUMED_ROUND_SIZE: usize = 15;

/// Default number of rounds to look back
pub const DEFAULT_LOOKBACK_ROUNDS: usize = 3;

/// Recent pairings, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchHistory {
    lookback_rounds: usize,
    entries: Vec<HistoricalPairing>,
}

impl Default for MatchHistory {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKBACK_ROUNDS)
    }
}

impl MatchHistory {
    pub fn new(lookback_rounds: usize) -> Self {
        Self {
            lookback_rounds,
            entries: Vec::new(),
        }
    }

    /// Maximum number of pairings retained
    pub fn capacity(&self) -> usize {
        self.lookback_rounds * ASSUMED_ROUND_SIZE
    }

    pub fn lookback_rounds(&self) -> usize {
        self.lookback_rounds
    }

    /// Change the lookback, pruning immediately if the window shrank
    pub fn set_lookback_rounds(&mut self, lookback_rounds: usize) {
        self.lookback_rounds = lookback_rounds;
        let capacity = self.capacity();
        self.entries.truncate(capacity);
    }

    /// Whether `a` and `b` met anywhere in the retained window, in either order
    pub fn has_recent_match(&self, a: &str, b: &str) -> bool {
        self.entries.iter().any(|entry| entry.is_between(a, b))
    }

    /// Prepend a round's pairings and prune to capacity
    pub fn record_round(&mut self, matches: &[Match], timestamp: DateTime<Utc>) {
        let mut entries: Vec<HistoricalPairing> = matches
            .iter()
            .map(|m| HistoricalPairing {
                player1: m.player1.clone(),
                player2: m.player2.clone(),
                timestamp,
            })
            .collect();
        entries.append(&mut self.entries);
        entries.truncate(self.capacity());
        self.entries = entries;
    }

    pub fn entries(&self) -> &[HistoricalPairing] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
