//! Odd-player carry-over policy
//!
//! When the pool is odd one player sits out. The player who sat out last round
//! is skipped where possible; among the rest the highest-uncertainty player is
//! chosen. Lookback is a single round.

use crate::types::PlayerRating;
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Outcome of applying the policy to a round's players
#[derive(Debug, Clone, PartialEq)]
pub struct CarryOverDecision {
    /// Even-sized list handed to the pairing engine, input order preserved
    pub to_pair: Vec<PlayerRating>,
    pub sit_out: Option<PlayerRating>,
    /// The sit-out player also sat out last round
    pub repeated: bool,
}

/// Higher uncertainty first, then lower ordinal, then lower id
fn sit_out_priority(a: &PlayerRating, b: &PlayerRating) -> Ordering {
    a.uncertainty
        .total_cmp(&b.uncertainty)
        .then_with(|| b.ordinal.total_cmp(&a.ordinal))
        .then_with(|| b.player.cmp(&a.player))
}

/// Decides who sits out an odd round
#[derive(Debug, Clone, Copy, Default)]
pub struct CarryOverPolicy;

impl CarryOverPolicy {
    pub fn new() -> Self {
        Self
    }

    pub fn apply(
        &self,
        mut players: Vec<PlayerRating>,
        previously_sat_out: Option<&str>,
    ) -> CarryOverDecision {
        if players.len() % 2 == 0 {
            return CarryOverDecision {
                to_pair: players,
                sit_out: None,
                repeated: false,
            };
        }

        let preferred = players
            .iter()
            .enumerate()
            .filter(|(_, p)| Some(p.player.as_str()) != previously_sat_out)
            .max_by(|(_, a), (_, b)| sit_out_priority(a, b))
            .map(|(index, _)| index);

        let (index, repeated) = match preferred {
            Some(index) => (index, false),
            None => {
                // Only the previous sit-out player is left to choose from
                let fallback = players
                    .iter()
                    .enumerate()
                    .max_by(|(_, a), (_, b)| sit_out_priority(a, b))
                    .map(|(index, _)| index)
                    .unwrap_or_default();
                (fallback, true)
            }
        };

        let sit_out = players.remove(index);
        if repeated {
            warn!(
                "{} sits out again: no other player available",
                sit_out.player
            );
        } else {
            debug!(
                "{} sits out this round (uncertainty {:.2})",
                sit_out.player, sit_out.uncertainty
            );
        }

        CarryOverDecision {
            to_pair: players,
            sit_out: Some(sit_out),
            repeated,
        }
    }
}
