//! Greedy pairing engine
//!
//! Players are seeded by conservative estimate (`mean - 3 * uncertainty`),
//! most proven first. Each unpaired player takes the cheapest remaining
//! partner later in the seed order. Pairs are never revisited, so the result
//! is not guaranteed to minimise total cost.

use crate::history::MatchHistory;
use crate::pairing::cost::PairingCostFunction;
use crate::rating::SkillModel;
use crate::tiers::TierIndex;
use crate::types::{Match, PlayerRating};
use crate::utils::rating_difference;
use std::cmp::Ordering;
use tracing::{debug, trace};

/// Single-pass greedy matcher
#[derive(Debug, Clone, Default)]
pub struct GreedyPairingEngine {
    cost: PairingCostFunction,
}

fn by_conservative_estimate_desc(a: &PlayerRating, b: &PlayerRating) -> Ordering {
    b.conservative_estimate()
        .total_cmp(&a.conservative_estimate())
        .then_with(|| b.ordinal.total_cmp(&a.ordinal))
        .then_with(|| a.player.cmp(&b.player))
}

fn build_match(a: &PlayerRating, b: &PlayerRating, cost: f64) -> Match {
    let mean_uncertainty = (a.uncertainty + b.uncertainty) / 2.0;
    Match {
        player1: a.player.clone(),
        player2: b.player.clone(),
        skill_difference: rating_difference(a.ordinal, b.ordinal),
        average_skill: (a.ordinal + b.ordinal) / 2.0,
        confidence: 1.0 / mean_uncertainty.max(f64::EPSILON),
        pairing_cost: cost,
    }
}

impl GreedyPairingEngine {
    pub fn new(cost: PairingCostFunction) -> Self {
        Self { cost }
    }

    pub fn cost_function(&self) -> &PairingCostFunction {
        &self.cost
    }

    /// Pair `players`, returning matches ordered by descending average skill.
    ///
    /// An odd player out is simply left unmatched.
    pub fn pair(
        &self,
        players: &[PlayerRating],
        tiers: &TierIndex,
        history: &MatchHistory,
        model: &dyn SkillModel,
    ) -> Vec<Match> {
        let mut seeded: Vec<&PlayerRating> = players.iter().collect();
        seeded.sort_by(|a, b| by_conservative_estimate_desc(a, b));

        let mut paired = vec![false; seeded.len()];
        let mut matches = Vec::with_capacity(seeded.len() / 2);

        for i in 0..seeded.len() {
            if paired[i] {
                continue;
            }

            let mut best: Option<(usize, f64)> = None;
            for j in (i + 1)..seeded.len() {
                if paired[j] {
                    continue;
                }
                let cost = self.cost.cost(model, tiers, history, seeded[i], seeded[j]);
                trace!(
                    "Candidate {} vs {}: cost {:.4}",
                    seeded[i].player,
                    seeded[j].player,
                    cost
                );
                // Strict comparison keeps the earliest candidate on ties
                if best.map_or(true, |(_, best_cost)| cost < best_cost) {
                    best = Some((j, cost));
                }
            }

            match best {
                Some((j, cost)) => {
                    paired[i] = true;
                    paired[j] = true;
                    matches.push(build_match(seeded[i], seeded[j], cost));
                }
                None => {
                    debug!("No partner left for {}", seeded[i].player);
                }
            }
        }

        // Stable sort keeps seed order among equal averages
        matches.sort_by(|a, b| b.average_skill.total_cmp(&a.average_skill));
        matches
    }
}
