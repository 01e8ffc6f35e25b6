//! Test fixtures shared by the integration tests

#![allow(dead_code)]

use std::sync::Arc;
use tier_pairing::config::MatchmakingConfig;
use tier_pairing::rating::{ExtendedWengLinConfig, WengLinSkillModel};
use tier_pairing::types::{Match, PlayerId, RoundReport};
use tier_pairing::Matchmaker;

/// Build a Weng-Lin model from `(id, ordinal, uncertainty)` triples.
///
/// The mean is derived so that `mean - 3 * uncertainty` equals the ordinal.
pub fn model_with(players: &[(&str, f64, f64)]) -> WengLinSkillModel {
    let mut model = WengLinSkillModel::new(ExtendedWengLinConfig::default())
        .expect("default Weng-Lin config is valid");
    for (id, ordinal, uncertainty) in players {
        model.insert_rating(*id, ordinal + 3.0 * uncertainty, *uncertainty);
    }
    model
}

pub fn matchmaker_with(players: &[(&str, f64, f64)], config: MatchmakingConfig) -> Matchmaker {
    Matchmaker::new(Arc::new(model_with(players)), config).expect("valid matchmaking config")
}

pub fn roster(ids: &[&str]) -> Vec<PlayerId> {
    ids.iter().map(|s| s.to_string()).collect()
}

/// Find the match containing both players, in either seat
pub fn find_pair<'a>(report: &'a RoundReport, a: &str, b: &str) -> Option<&'a Match> {
    report
        .matches
        .iter()
        .find(|m| m.involves(a) && m.involves(b))
}

/// Check the per-round invariants every report must satisfy
pub fn assert_round_invariants(report: &RoundReport, roster: &[PlayerId]) {
    let mut seen = std::collections::HashSet::new();
    for m in &report.matches {
        assert_ne!(m.player1, m.player2, "self pairing in {:?}", m);
        assert!(seen.insert(m.player1.clone()), "{} double booked", m.player1);
        assert!(seen.insert(m.player2.clone()), "{} double booked", m.player2);
        assert!(m.skill_difference >= 0.0);
        assert!(m.confidence > 0.0);
        assert!(m.pairing_cost >= 0.0);
    }
    if let Some(unmatched) = &report.unmatched {
        assert!(seen.insert(unmatched.clone()), "{} both matched and unmatched", unmatched);
    }

    let unmatched = usize::from(report.unmatched.is_some());
    assert_eq!(2 * report.matches.len() + unmatched, roster.len());
    assert_eq!(report.total_players, roster.len());
    assert!(roster.iter().all(|p| seen.contains(p)));
}
