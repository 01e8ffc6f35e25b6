//! Skill tier assembly
//!
//! Players are sorted by ordinal and cut into contiguous bands. A band closes
//! when the next player falls further below its first player than the
//! adaptive width allows, or when it reaches the size cap.

use crate::config::TierConfig;
use crate::types::{PlayerRating, TierSummary};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// A contiguous skill band, rebuilt every round
#[derive(Debug, Clone, PartialEq)]
pub struct SkillTier {
    pub label: String,
    /// Ordinal-descending
    pub players: Vec<PlayerRating>,
    pub min_ordinal: f64,
    pub max_ordinal: f64,
}

impl SkillTier {
    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, player: &str) -> bool {
        self.players.iter().any(|p| p.player == player)
    }

    pub fn summary(&self) -> TierSummary {
        TierSummary {
            label: self.label.clone(),
            players: self.players.iter().map(|p| p.player.clone()).collect(),
            min_ordinal: self.min_ordinal,
            max_ordinal: self.max_ordinal,
        }
    }

    fn from_players(label: String, players: Vec<PlayerRating>) -> Self {
        // Players arrive ordinal-descending
        let max_ordinal = players.first().map(|p| p.ordinal).unwrap_or_default();
        let min_ordinal = players.last().map(|p| p.ordinal).unwrap_or_default();
        Self {
            label,
            players,
            min_ordinal,
            max_ordinal,
        }
    }
}

/// Descending ordinal, ties broken by player id so output is deterministic
pub(crate) fn by_ordinal_desc(a: &PlayerRating, b: &PlayerRating) -> Ordering {
    b.ordinal
        .total_cmp(&a.ordinal)
        .then_with(|| a.player.cmp(&b.player))
}

/// Builds skill tiers from a roster snapshot
#[derive(Debug, Clone, Default)]
pub struct TierBuilder {
    config: TierConfig,
}

impl TierBuilder {
    pub fn new(config: TierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TierConfig {
        &self.config
    }

    /// Partition `players` into tiers, highest skill first
    pub fn build(&self, players: &[PlayerRating]) -> Vec<SkillTier> {
        let mut sorted = players.to_vec();
        sorted.sort_by(by_ordinal_desc);

        let mut groups: Vec<Vec<PlayerRating>> = Vec::new();
        let mut current: Vec<PlayerRating> = Vec::new();

        for player in sorted {
            let closes = match current.first() {
                None => false,
                Some(first) => {
                    let width = self.config.width_for(first.ordinal);
                    first.ordinal - player.ordinal > width
                        || current.len() >= self.config.max_tier_size
                }
            };

            if closes {
                groups.push(std::mem::take(&mut current));
            }
            current.push(player);
        }
        if !current.is_empty() {
            groups.push(current);
        }

        let tiers: Vec<SkillTier> = groups
            .into_iter()
            .enumerate()
            .map(|(index, players)| SkillTier::from_players(self.config.label_for(index), players))
            .collect();

        debug!(
            "Built {} tiers from {} players",
            tiers.len(),
            players.len()
        );

        tiers
    }
}

/// Player id to tier position lookup (0 = highest skill)
#[derive(Debug, Clone, Default)]
pub struct TierIndex {
    positions: HashMap<String, usize>,
}

impl TierIndex {
    pub fn new(tiers: &[SkillTier]) -> Self {
        let positions = tiers
            .iter()
            .enumerate()
            .flat_map(|(index, tier)| tier.players.iter().map(move |p| (p.player.clone(), index)))
            .collect();
        Self { positions }
    }

    /// Index with no tiers at all, as used by the tier-naive strategy
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn tier_of(&self, player: &str) -> Option<usize> {
        self.positions.get(player).copied()
    }

    /// Distance in tiers between two players, `None` if either is untiered
    pub fn gap(&self, a: &str, b: &str) -> Option<usize> {
        Some(self.tier_of(a)?.abs_diff(self.tier_of(b)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str, ordinal: f64) -> PlayerRating {
        PlayerRating::with_ordinal(id, ordinal + 3.0, 1.0, ordinal)
    }

    fn ids(tier: &SkillTier) -> Vec<&str> {
        tier.players.iter().map(|p| p.player.as_str()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(TierBuilder::default().build(&[]).is_empty());
    }

    #[test]
    fn test_splits_on_ordinal_gap() {
        let players = vec![
            player("c", 2.0),
            player("a", 20.0),
            player("d", 0.0),
            player("b", 18.0),
        ];
        let tiers = TierBuilder::default().build(&players);

        assert_eq!(tiers.len(), 2);
        assert_eq!(ids(&tiers[0]), vec!["a", "b"]);
        assert_eq!(ids(&tiers[1]), vec!["c", "d"]);
        assert_eq!(tiers[0].label, "Elite");
        assert_eq!(tiers[0].max_ordinal, 20.0);
        assert_eq!(tiers[0].min_ordinal, 18.0);
    }

    #[test]
    fn test_top_tiers_are_narrower() {
        // A 2.5 gap fits a low tier but not one starting above 15
        let low = TierBuilder::default().build(&[player("a", 3.0), player("b", 0.5)]);
        assert_eq!(low.len(), 1);

        let high = TierBuilder::default().build(&[player("a", 20.0), player("b", 17.5)]);
        assert_eq!(high.len(), 2);
    }

    #[test]
    fn test_width_measured_from_first_player() {
        // Each step is small but the chain drifts past the width
        let players: Vec<_> = (0..5).map(|i| player(&format!("p{}", i), -(i as f64))).collect();
        let tiers = TierBuilder::default().build(&players);

        assert_eq!(tiers.len(), 2);
        assert_eq!(ids(&tiers[0]), vec!["p0", "p1", "p2", "p3"]);
        assert_eq!(ids(&tiers[1]), vec!["p4"]);
    }

    #[test]
    fn test_max_tier_size() {
        let players: Vec<_> = (0..8).map(|i| player(&format!("p{}", i), 0.0)).collect();
        let tiers = TierBuilder::default().build(&players);

        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers[0].len(), 6);
        assert_eq!(tiers[1].len(), 2);
    }

    #[test]
    fn test_overflow_labels() {
        let players: Vec<_> = (0..8)
            .map(|i| player(&format!("p{}", i), -10.0 * i as f64))
            .collect();
        let tiers = TierBuilder::default().build(&players);

        assert_eq!(tiers.len(), 8);
        assert_eq!(tiers[5].label, "Novice");
        assert_eq!(tiers[6].label, "Tier 7");
        assert_eq!(tiers[7].label, "Tier 8");
    }

    #[test]
    fn test_tier_index_gap() {
        let players = vec![
            player("a", 20.0),
            player("b", 10.0),
            player("c", 0.0),
        ];
        let tiers = TierBuilder::default().build(&players);
        let index = TierIndex::new(&tiers);

        assert_eq!(index.tier_of("a"), Some(0));
        assert_eq!(index.gap("a", "c"), Some(2));
        assert_eq!(index.gap("c", "a"), Some(2));
        assert_eq!(index.gap("a", "nobody"), None);
        assert_eq!(TierIndex::empty().gap("a", "b"), None);
    }
}
