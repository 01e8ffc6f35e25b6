//! Skill model interface consumed by the pairing engine
//!
//! The engine never names a concrete rating algorithm; it only needs a way to
//! look up a player's rating and to compare two ratings.

use crate::types::PlayerRating;

/// Capability interface over whatever rating system backs the tournament
#[cfg_attr(test, mockall::automock)]
pub trait SkillModel: Send + Sync {
    /// Current rating for a player, `None` if the model has never seen them
    fn rating_of(&self, player: &str) -> Option<PlayerRating>;

    /// Probability in `[0, 1]` that the two players produce a near-even contest
    fn draw_probability(&self, a: &PlayerRating, b: &PlayerRating) -> f64;

    /// The model's prior for a brand new player
    fn initial_rating(&self, player: &str) -> PlayerRating;
}
