//! Property tests for tiering, pairing and the cost function

mod fixtures;

use chrono::Utc;
use proptest::prelude::*;
use tier_pairing::config::{MatchmakingConfig, TierConfig, TierPenaltyTable};
use tier_pairing::history::{CarryOverState, MatchHistory};
use tier_pairing::pairing::PairingCostFunction;
use tier_pairing::rating::{ExtendedWengLinConfig, WengLinSkillModel};
use tier_pairing::tiers::{TierBuilder, TierIndex};
use tier_pairing::types::{Match, PlayerId, PlayerRating, RoundState};

use fixtures::{assert_round_invariants, matchmaker_with};

fn roster_strategy(max: usize) -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-10.0f64..40.0, 0.5f64..8.0), 0..max)
}

fn player_id(index: usize) -> PlayerId {
    format!("p{:03}", index)
}

fn ratings(pool: &[(f64, f64)]) -> Vec<PlayerRating> {
    pool
        .iter()
        .enumerate()
        .map(|(i, (ordinal, sigma))| PlayerRating::new(player_id(i), ordinal + 3.0 * sigma, *sigma))
        .collect()
}

proptest! {
    #[test]
    fn test_tiers_partition_roster_in_skill_order(pool in roster_strategy(40)) {
        let players = ratings(&pool);
        let config = TierConfig::default();
        let tiers = TierBuilder::new(config.clone()).build(&players);

        let total: usize = tiers.iter().map(|t| t.len()).sum();
        prop_assert_eq!(total, players.len());
        for player in &players {
            prop_assert_eq!(tiers.iter().filter(|t| t.contains(&player.player)).count(), 1);
        }

        for tier in &tiers {
            prop_assert!(!tier.is_empty());
            prop_assert!(tier.len() <= config.max_tier_size);
            let top = tier.players[0].ordinal;
            for p in &tier.players {
                prop_assert!(top - p.ordinal <= config.width_for(top) + 1e-9);
            }
        }

        for pair in tiers.windows(2) {
            prop_assert!(pair[0].min_ordinal >= pair[1].max_ordinal);
        }
    }

    #[test]
    fn test_round_never_double_books(pool in roster_strategy(30), prev in any::<prop::sample::Index>()) {
        let ids: Vec<String> = (0..pool.len()).map(player_id).collect();
        let triples: Vec<(&str, f64, f64)> = ids
            .iter()
            .zip(&pool)
            .map(|(id, (ordinal, sigma))| (id.as_str(), *ordinal, *sigma))
            .collect();
        let matchmaker = matchmaker_with(&triples, MatchmakingConfig::default());

        let previously_sat_out = if ids.is_empty() { None } else { Some(ids[prev.index(ids.len())].clone()) };
        let state = CarryOverState {
            round: RoundState { previously_sat_out: previously_sat_out.clone() },
            ..CarryOverState::default()
        };

        let outcome = matchmaker.run_round(&ids, state, Utc::now()).unwrap();
        assert_round_invariants(&outcome.report, &ids);

        if ids.len() >= 3 && ids.len() % 2 == 1 {
            prop_assert!(outcome.report.unmatched.is_some());
            prop_assert_ne!(outcome.report.unmatched, previously_sat_out);
        }

        let averages: Vec<f64> = outcome.report.matches.iter().map(|m| m.average_skill).collect();
        prop_assert!(averages.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_recent_pairing_costs_exactly_the_penalty_more(
        a in (-10.0f64..40.0, 0.5f64..8.0),
        b in (-10.0f64..40.0, 0.5f64..8.0),
    ) {
        let players = ratings(&[a, b]);
        let model = WengLinSkillModel::new(ExtendedWengLinConfig::default()).unwrap();
        let tiers = TierIndex::new(&TierBuilder::default().build(&players));
        let cost = PairingCostFunction::default();

        let fresh = MatchHistory::default();
        let mut recent = MatchHistory::default();
        recent.record_round(
            &[Match {
                player1: players[1].player.clone(),
                player2: players[0].player.clone(),
                skill_difference: 0.0,
                average_skill: 0.0,
                confidence: 1.0,
                pairing_cost: 0.0,
            }],
            Utc::now(),
        );

        let before = cost.cost(&model, &tiers, &fresh, &players[0], &players[1]);
        let after = cost.cost(&model, &tiers, &recent, &players[0], &players[1]);
        prop_assert!(before >= 0.0);
        prop_assert!((after - before - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_base_cost_grows_with_skill_distance(
        ordinal in -10.0f64..30.0,
        sigma in 0.5f64..8.0,
        near in 0.0f64..10.0,
        extra in 0.0f64..10.0,
    ) {
        let model = WengLinSkillModel::new(ExtendedWengLinConfig::default()).unwrap();
        let cost = PairingCostFunction::default();
        let anchor = PlayerRating::new("anchor", ordinal + 3.0 * sigma, sigma);
        let close = PlayerRating::new("close", ordinal + near + 3.0 * sigma, sigma);
        let far = PlayerRating::new("far", ordinal + near + extra + 3.0 * sigma, sigma);

        let close_cost = cost.base_cost(&model, &anchor, &close);
        let far_cost = cost.base_cost(&model, &anchor, &far);
        prop_assert!(close_cost <= far_cost + 1e-12);
    }

    #[test]
    fn test_tier_penalty_grows_with_gap(gap in 0usize..50) {
        let table = TierPenaltyTable::default();
        prop_assert!(table.penalty(gap) <= table.penalty(gap + 1));
        prop_assert!(table.penalty(gap) >= 0.0);
    }

    #[test]
    fn test_tier_width_narrows_with_skill(low in -20.0f64..40.0, delta in 0.0f64..20.0) {
        let config = TierConfig::default();
        prop_assert!(config.width_for(low + delta) <= config.width_for(low));
    }

    #[test]
    fn test_draw_probability_is_symmetric(
        a in (-10.0f64..40.0, 0.5f64..8.0),
        b in (-10.0f64..40.0, 0.5f64..8.0),
    ) {
        use tier_pairing::SkillModel;

        let players = ratings(&[a, b]);
        let model = WengLinSkillModel::new(ExtendedWengLinConfig::default()).unwrap();
        let ab = model.draw_probability(&players[0], &players[1]);
        let ba = model.draw_probability(&players[1], &players[0]);

        prop_assert!((0.0..=1.0).contains(&ab));
        prop_assert!((ab - ba).abs() < 1e-9);
    }
}
