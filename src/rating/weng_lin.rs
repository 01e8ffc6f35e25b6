//! Weng-Lin (OpenSkill) skill model
//!
//! This module provides the default [`SkillModel`] implementation on top of
//! the Weng-Lin algorithm from the skillratings crate, together with 1v1
//! outcome updates for the ratings book.

use crate::error::PairingError;
use crate::rating::model::SkillModel;
use crate::rating::storage::{RatingBook, RatingEntry};
use crate::types::{MatchResult, PlayerRating};
use serde::{Deserialize, Serialize};
use skillratings::weng_lin::{expected_score, weng_lin, WengLinConfig, WengLinRating};
use skillratings::Outcomes;
use tracing::debug;

/// Extended configuration for the Weng-Lin rating system
/// This wraps the skillratings WengLinConfig with the prior for new players
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtendedWengLinConfig {
    /// Core Weng-Lin parameters
    pub weng_lin_config: WengLinConfig,
    /// Initial mean for new players
    pub initial_rating: f64,
    /// Initial uncertainty for new players
    pub initial_uncertainty: f64,
}

impl Default for ExtendedWengLinConfig {
    fn default() -> Self {
        Self {
            weng_lin_config: WengLinConfig {
                beta: 25.0 / 6.0,
                uncertainty_tolerance: 0.000_001,
            },
            initial_rating: 25.0,
            initial_uncertainty: 25.0 / 3.0,
        }
    }
}

impl ExtendedWengLinConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.weng_lin_config.beta <= 0.0 {
            return Err(PairingError::ConfigurationError {
                message: "Beta must be positive".to_string(),
            }
            .into());
        }

        if self.weng_lin_config.uncertainty_tolerance < 0.0 {
            return Err(PairingError::ConfigurationError {
                message: "Uncertainty tolerance must be non-negative".to_string(),
            }
            .into());
        }

        if self.initial_uncertainty <= 0.0 {
            return Err(PairingError::ConfigurationError {
                message: "Initial uncertainty must be positive".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

fn to_weng_lin(rating: &PlayerRating) -> WengLinRating {
    WengLinRating {
        rating: rating.mean,
        uncertainty: rating.uncertainty,
    }
}

/// Weng-Lin backed skill model over a ratings book
#[derive(Debug, Clone)]
pub struct WengLinSkillModel {
    config: ExtendedWengLinConfig,
    book: RatingBook,
}

impl WengLinSkillModel {
    /// Create a model with no known players
    pub fn new(config: ExtendedWengLinConfig) -> crate::error::Result<Self> {
        Self::with_book(config, RatingBook::new())
    }

    /// Create a model over an existing ratings book
    pub fn with_book(config: ExtendedWengLinConfig, book: RatingBook) -> crate::error::Result<Self> {
        config.validate()?;
        Ok(Self { config, book })
    }

    /// Seed or overwrite a player's rating
    pub fn insert_rating(&mut self, player: impl Into<String>, mean: f64, uncertainty: f64) {
        self.book.insert(player, RatingEntry::new(mean, uncertainty));
    }

    pub fn book(&self) -> &RatingBook {
        &self.book
    }

    pub fn into_book(self) -> RatingBook {
        self.book
    }

    pub fn config(&self) -> &ExtendedWengLinConfig {
        &self.config
    }

    fn rating_or_prior(&self, player: &str) -> PlayerRating {
        self.rating_of(player)
            .unwrap_or_else(|| self.initial_rating(player))
    }

    /// Apply a finished 1v1 game, from `player1`'s point of view.
    ///
    /// Unknown players start from the prior. Returns both updated ratings.
    pub fn record_outcome(
        &mut self,
        player1: &str,
        player2: &str,
        result: MatchResult,
    ) -> crate::error::Result<(PlayerRating, PlayerRating)> {
        if player1 == player2 {
            return Err(PairingError::InvalidOutcome {
                reason: format!("{} cannot play against themselves", player1),
            }
            .into());
        }

        let before1 = to_weng_lin(&self.rating_or_prior(player1));
        let before2 = to_weng_lin(&self.rating_or_prior(player2));

        let outcome = match result {
            MatchResult::Win => Outcomes::WIN,
            MatchResult::Loss => Outcomes::LOSS,
            MatchResult::Draw => Outcomes::DRAW,
        };

        let (after1, after2) = weng_lin(&before1, &before2, &outcome, &self.config.weng_lin_config);

        for (player, rating) in [(player1, after1), (player2, after2)] {
            match self.book.get_mut(player) {
                Some(entry) => entry.update_rating(rating.rating, rating.uncertainty),
                None => {
                    let mut entry = RatingEntry::new(rating.rating, rating.uncertainty);
                    entry.games_played = 1;
                    self.book.insert(player, entry);
                }
            }
        }

        debug!(
            "Recorded {} for {} vs {}: {:.2} -> {:.2}, {:.2} -> {:.2}",
            result, player1, player2, before1.rating, after1.rating, before2.rating, after2.rating
        );

        Ok((
            PlayerRating::new(player1, after1.rating, after1.uncertainty),
            PlayerRating::new(player2, after2.rating, after2.uncertainty),
        ))
    }
}

impl SkillModel for WengLinSkillModel {
    fn rating_of(&self, player: &str) -> Option<PlayerRating> {
        self.book
            .get(player)
            .map(|entry| PlayerRating::new(player, entry.mean, entry.uncertainty))
    }

    /// One minus the gap between the two win probabilities: 1.0 for identical
    /// ratings, falling towards 0.0 as the means separate.
    fn draw_probability(&self, a: &PlayerRating, b: &PlayerRating) -> f64 {
        let (win_a, win_b) =
            expected_score(&to_weng_lin(a), &to_weng_lin(b), &self.config.weng_lin_config);
        (1.0 - (win_a - win_b).abs()).clamp(0.0, 1.0)
    }

    fn initial_rating(&self, player: &str) -> PlayerRating {
        PlayerRating::new(
            player,
            self.config.initial_rating,
            self.config.initial_uncertainty,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> WengLinSkillModel {
        WengLinSkillModel::new(ExtendedWengLinConfig::default()).unwrap()
    }

    #[test]
    fn test_extended_weng_lin_config_default() {
        let config = ExtendedWengLinConfig::default();
        assert_eq!(config.initial_rating, 25.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_extended_weng_lin_config_validation() {
        let mut config = ExtendedWengLinConfig::default();
        config.weng_lin_config.beta = -1.0;
        assert!(config.validate().is_err());

        config = ExtendedWengLinConfig::default();
        config.weng_lin_config.uncertainty_tolerance = -1.0;
        assert!(config.validate().is_err());

        config = ExtendedWengLinConfig::default();
        config.initial_uncertainty = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_prior_has_zero_ordinal() {
        let prior = model().initial_rating("newcomer");
        assert_eq!(prior.player, "newcomer");
        assert!(prior.ordinal.abs() < 1e-9);
    }

    #[test]
    fn test_rating_lookup() {
        let mut model = model();
        assert!(model.rating_of("alice").is_none());

        model.insert_rating("alice", 30.0, 2.0);
        let rating = model.rating_of("alice").unwrap();
        assert_eq!(rating.mean, 30.0);
        assert_eq!(rating.ordinal, 24.0);
    }

    #[test]
    fn test_draw_probability_is_symmetric_and_bounded() {
        let model = model();
        let a = PlayerRating::new("a", 30.0, 2.0);
        let b = PlayerRating::new("b", 22.0, 4.0);

        let ab = model.draw_probability(&a, &b);
        let ba = model.draw_probability(&b, &a);
        assert!((ab - ba).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&ab));

        let same = model.draw_probability(&a, &a);
        assert!((same - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_draw_probability_falls_with_distance() {
        let model = model();
        let anchor = PlayerRating::new("anchor", 25.0, 3.0);
        let mut previous = 1.0;
        for step in 1..10 {
            let other = PlayerRating::new("other", 25.0 + step as f64 * 2.0, 3.0);
            let p = model.draw_probability(&anchor, &other);
            assert!(p <= previous);
            previous = p;
        }
    }

    #[test]
    fn test_record_outcome_moves_ratings() {
        let mut model = model();
        model.insert_rating("alice", 25.0, 8.0);

        let (winner, loser) = model
            .record_outcome("alice", "bob", MatchResult::Win)
            .unwrap();

        assert!(winner.mean > 25.0);
        assert!(loser.mean < 25.0);
        assert!(winner.uncertainty < 8.0);
        assert_eq!(model.book().get("alice").unwrap().games_played, 1);
        assert_eq!(model.book().get("bob").unwrap().games_played, 1);
    }

    #[test]
    fn test_record_outcome_rejects_self_match() {
        let mut model = model();
        assert!(model
            .record_outcome("alice", "alice", MatchResult::Draw)
            .is_err());
    }
}
