//! Carry-over state persistence
//!
//! The history window and the last sit-out player are the only state that
//! outlives a round. They are loaded once before a round and saved once after.
//! A state file that cannot be parsed is replaced by an empty state rather
//! than failing the round.

use crate::error::PairingError;
use crate::history::window::MatchHistory;
use crate::types::{RoundState, RoundWarning};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, warn};

/// Everything carried from one round into the next
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarryOverState {
    pub history: MatchHistory,
    pub round: RoundState,
}

impl CarryOverState {
    /// Empty state with the given history lookback
    pub fn new(lookback_rounds: usize) -> Self {
        Self {
            history: MatchHistory::new(lookback_rounds),
            round: RoundState::default(),
        }
    }
}

/// Loaded state plus anything that went wrong while recovering it
#[derive(Debug, Clone, Default)]
pub struct LoadedState {
    pub state: CarryOverState,
    pub warnings: Vec<RoundWarning>,
}

/// Trait for carry-over storage operations
pub trait CarryOverStore: Send + Sync {
    /// Load the current state; absent or corrupt state loads as empty
    fn load(&self) -> crate::error::Result<LoadedState>;

    /// Persist the state produced by a round
    fn save(&self, state: &CarryOverState) -> crate::error::Result<()>;
}

/// JSON file backed store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Staging file in the same directory as the target
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CarryOverStore for JsonFileStore {
    fn load(&self) -> crate::error::Result<LoadedState> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(
                    "No carry-over state at {}, starting fresh",
                    self.path.display()
                );
                return Ok(LoadedState::default());
            }
            Err(e) => {
                return Err(PairingError::StorageError {
                    message: format!("Failed to read {}: {}", self.path.display(), e),
                }
                .into())
            }
        };

        match serde_json::from_str::<CarryOverState>(&contents) {
            Ok(state) => {
                debug!(
                    "Loaded {} historical pairings from {}",
                    state.history.len(),
                    self.path.display()
                );
                Ok(LoadedState {
                    state,
                    warnings: Vec::new(),
                })
            }
            Err(e) => {
                let warning = RoundWarning::StateRecovered {
                    reason: format!("{} is unreadable: {}", self.path.display(), e),
                };
                warn!("{}", warning);
                Ok(LoadedState {
                    state: CarryOverState::default(),
                    warnings: vec![warning],
                })
            }
        }
    }

    /// Written to a sibling temp file, then renamed over the target
    fn save(&self, state: &CarryOverState) -> crate::error::Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        let temp_path = self.temp_path();

        std::fs::write(&temp_path, json).map_err(|e| PairingError::StorageError {
            message: format!("Failed to write {}: {}", temp_path.display(), e),
        })?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&temp_path);
            PairingError::StorageError {
                message: format!(
                    "Failed to move {} into place at {}: {}",
                    temp_path.display(),
                    self.path.display(),
                    e
                ),
            }
        })?;

        debug!("Saved carry-over state to {}", self.path.display());
        Ok(())
    }
}

/// In-memory store for tests and simulations
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<Option<CarryOverState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset state for testing
    pub fn with_state(state: CarryOverState) -> Self {
        Self {
            state: RwLock::new(Some(state)),
        }
    }
}

impl CarryOverStore for InMemoryStore {
    fn load(&self) -> crate::error::Result<LoadedState> {
        let state = self
            .state
            .read()
            .map_err(|_| PairingError::StorageError {
                message: "Failed to acquire state read lock".to_string(),
            })?;

        Ok(LoadedState {
            state: state.clone().unwrap_or_default(),
            warnings: Vec::new(),
        })
    }

    fn save(&self, state: &CarryOverState) -> crate::error::Result<()> {
        let mut stored = self
            .state
            .write()
            .map_err(|_| PairingError::StorageError {
                message: "Failed to acquire state write lock".to_string(),
            })?;

        *stored = Some(state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Match;
    use chrono::Utc;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{}-{}.json", name, uuid::Uuid::new_v4()))
    }

    fn sample_state() -> CarryOverState {
        let mut state = CarryOverState::new(2);
        state.history.record_round(
            &[Match {
                player1: "a".to_string(),
                player2: "b".to_string(),
                skill_difference: 1.0,
                average_skill: 10.0,
                confidence: 0.5,
                pairing_cost: 0.2,
            }],
            Utc::now(),
        );
        state.round.previously_sat_out = Some("c".to_string());
        state
    }

    #[test]
    fn test_missing_file_loads_empty_without_warning() {
        let store = JsonFileStore::new(temp_path("missing-state"));
        let loaded = store.load().unwrap();

        assert!(loaded.state.history.is_empty());
        assert!(loaded.state.round.previously_sat_out.is_none());
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = temp_path("state");
        let store = JsonFileStore::new(&path);
        let state = sample_state();

        store.save(&state).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.state, state);
        assert!(loaded.state.history.has_recent_match("b", "a"));
        assert!(loaded.warnings.is_empty());

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_corrupt_file_recovers_with_warning() {
        let path = temp_path("corrupt-state");
        std::fs::write(&path, "{\"history\": [oops").unwrap();

        let loaded = JsonFileStore::new(&path).load().unwrap();

        assert!(loaded.state.history.is_empty());
        assert_eq!(loaded.warnings.len(), 1);
        assert!(matches!(
            loaded.warnings[0],
            RoundWarning::StateRecovered { .. }
        ));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_save_replaces_existing_file_without_leftovers() {
        let path = temp_path("replace-state");
        std::fs::write(&path, "{\"history\": [oops").unwrap();
        let store = JsonFileStore::new(&path);
        let state = sample_state();

        store.save(&state).unwrap();

        assert!(!store.temp_path().exists());
        let loaded = store.load().unwrap();
        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.state, state);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_stale_temp_file_does_not_affect_load() {
        let path = temp_path("stale-temp-state");
        let store = JsonFileStore::new(&path);
        let state = sample_state();
        store.save(&state).unwrap();

        // An interrupted save leaves only the staging file half written
        std::fs::write(store.temp_path(), "{\"history\": [tr").unwrap();

        let loaded = store.load().unwrap();
        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.state, state);

        store.save(&state).unwrap();
        assert!(!store.temp_path().exists());

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_in_memory_store() {
        let store = InMemoryStore::new();
        assert!(store.load().unwrap().state.history.is_empty());

        let state = sample_state();
        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap().state, state);

        let preset = InMemoryStore::with_state(state.clone());
        assert_eq!(preset.load().unwrap().state, state);
    }
}
