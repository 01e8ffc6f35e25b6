//! Pairing cost function
//!
//! Cost of a candidate pair is the sum of three terms:
//! - base: `1 - draw_probability`, the skill mismatch
//! - tier distance, escalating with the number of tiers between the players
//! - a flat recency penalty if the two met inside the history window
//!
//! Lower is better. The function is pure given its inputs.

use crate::config::{PairingConfig, TierPenaltyTable};
use crate::history::MatchHistory;
use crate::rating::SkillModel;
use crate::tiers::TierIndex;
use crate::types::PlayerRating;

/// Scores candidate pairings
#[derive(Debug, Clone)]
pub struct PairingCostFunction {
    tier_penalties: TierPenaltyTable,
    recency_penalty: f64,
}

impl Default for PairingCostFunction {
    fn default() -> Self {
        Self::new(&PairingConfig::default())
    }
}

impl PairingCostFunction {
    pub fn new(config: &PairingConfig) -> Self {
        Self {
            tier_penalties: config.tier_penalties.clone(),
            recency_penalty: config.effective_recency_penalty(),
        }
    }

    /// Skill mismatch term
    pub fn base_cost(&self, model: &dyn SkillModel, a: &PlayerRating, b: &PlayerRating) -> f64 {
        1.0 - model.draw_probability(a, b).clamp(0.0, 1.0)
    }

    /// Penalty for crossing tiers; untiered players are never penalised
    pub fn tier_penalty(&self, tiers: &TierIndex, a: &PlayerRating, b: &PlayerRating) -> f64 {
        tiers
            .gap(&a.player, &b.player)
            .map(|gap| self.tier_penalties.penalty(gap))
            .unwrap_or(0.0)
    }

    /// Flat penalty for a pairing still inside the history window
    pub fn recency_penalty(&self, history: &MatchHistory, a: &PlayerRating, b: &PlayerRating) -> f64 {
        if history.has_recent_match(&a.player, &b.player) {
            self.recency_penalty
        } else {
            0.0
        }
    }

    /// Total cost of pairing `a` with `b`
    pub fn cost(
        &self,
        model: &dyn SkillModel,
        tiers: &TierIndex,
        history: &MatchHistory,
        a: &PlayerRating,
        b: &PlayerRating,
    ) -> f64 {
        let total = self.base_cost(model, a, b)
            + self.tier_penalty(tiers, a, b)
            + self.recency_penalty(history, a, b);
        total.max(0.0)
    }
}
