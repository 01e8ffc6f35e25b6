//! Persistent rating book
//!
//! Ratings are kept as a JSON object keyed by player id. A missing file is an
//! empty book; a malformed one is an error, since ratings cannot be rebuilt
//! from nothing.

use crate::error::PairingError;
use crate::types::PlayerId;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Storage entry for a player's rating with metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingEntry {
    pub mean: f64,
    pub uncertainty: f64,
    pub games_played: u64,
    pub last_updated: DateTime<Utc>,
}

impl RatingEntry {
    /// Create a new rating entry for a player with no games
    pub fn new(mean: f64, uncertainty: f64) -> Self {
        Self {
            mean,
            uncertainty,
            games_played: 0,
            last_updated: Utc::now(),
        }
    }

    /// Update the rating and increment games played
    pub fn update_rating(&mut self, mean: f64, uncertainty: f64) {
        self.mean = mean;
        self.uncertainty = uncertainty;
        self.games_played += 1;
        self.last_updated = Utc::now();
    }
}

/// All known ratings, ordered by player id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingBook {
    ratings: BTreeMap<PlayerId, RatingEntry>,
}

impl RatingBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a book from disk, starting empty if the file does not exist
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No ratings file at {}, starting empty", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(PairingError::StorageError {
                    message: format!("Failed to read {}: {}", path.display(), e),
                }
                .into())
            }
        };

        let book: RatingBook = serde_json::from_str(&contents)
            .with_context(|| format!("Malformed ratings file {}", path.display()))?;
        debug!("Loaded {} ratings from {}", book.len(), path.display());
        Ok(book)
    }

    /// Write the book as pretty JSON
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| PairingError::StorageError {
            message: format!("Failed to write {}: {}", path.display(), e),
        })?;
        Ok(())
    }

    pub fn get(&self, player: &str) -> Option<&RatingEntry> {
        self.ratings.get(player)
    }

    pub fn get_mut(&mut self, player: &str) -> Option<&mut RatingEntry> {
        self.ratings.get_mut(player)
    }

    /// Insert or replace a player's entry
    pub fn insert(&mut self, player: impl Into<PlayerId>, entry: RatingEntry) {
        self.ratings.insert(player.into(), entry);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, &RatingEntry)> {
        self.ratings.iter()
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}
