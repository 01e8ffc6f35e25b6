//! Round Simulator CLI Tool
//!
//! Runs a deterministic multi-round tournament against a synthetic roster to
//! show how tiers, rematch avoidance and sit-out rotation behave over time.
//! Every player has a hidden strength; the stronger player always wins and
//! equal strengths draw. Ratings start at the prior and evolve each round.
//!
//! Usage:
//!   cargo run --bin round-sim -- --help
//!   cargo run --bin round-sim -- --players 11 --rounds 12
//!   cargo run --bin round-sim -- --players 9 --rounds 6 --strategy tier_naive --verbose

use anyhow::{anyhow, Result};
use clap::Parser;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tier_pairing::config::{MatchmakingConfig, PairingConfig, PairingStrategy};
use tier_pairing::history::{CarryOverStore, InMemoryStore};
use tier_pairing::metrics::MetricsCollector;
use tier_pairing::rating::{ExtendedWengLinConfig, WengLinSkillModel};
use tier_pairing::types::{MatchResult, PlayerId};
use tier_pairing::utils::current_timestamp;
use tier_pairing::Matchmaker;

#[derive(Parser)]
#[command(name = "round-sim")]
#[command(about = "Simulate repeated pairing rounds over a synthetic roster")]
struct Cli {
    /// Number of players in the roster
    #[arg(short, long, default_value = "9")]
    players: usize,

    /// Number of rounds to play
    #[arg(short, long, default_value = "8")]
    rounds: usize,

    /// Pairing strategy (tier_aware or tier_naive)
    #[arg(short, long, default_value = "tier_aware")]
    strategy: PairingStrategy,

    /// Print every round's pairings
    #[arg(short, long)]
    verbose: bool,
}

fn player_name(index: usize) -> PlayerId {
    format!("player{:02}", index + 1)
}

/// Hidden strength; lower is stronger. Ids are 1-based, so player01/player02
/// share level 0, player03/player04 level 1, and so on.
fn strength(player: &str) -> Result<usize> {
    let number: usize = player
        .trim_start_matches("player")
        .parse()
        .map_err(|_| anyhow!("Unexpected player id {}", player))?;
    number
        .checked_sub(1)
        .map(|index| index / 2)
        .ok_or_else(|| anyhow!("Unexpected player id {}", player))
}

fn decide(player1: &str, player2: &str) -> Result<MatchResult> {
    let (s1, s2) = (strength(player1)?, strength(player2)?);
    Ok(match s1.cmp(&s2) {
        std::cmp::Ordering::Less => MatchResult::Win,
        std::cmp::Ordering::Greater => MatchResult::Loss,
        std::cmp::Ordering::Equal => MatchResult::Draw,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    if cli.players < 2 {
        return Err(anyhow!("Need at least two players to simulate"));
    }

    let roster: Vec<PlayerId> = (0..cli.players).map(player_name).collect();
    let config = MatchmakingConfig {
        pairing: PairingConfig {
            strategy: cli.strategy,
            ..PairingConfig::default()
        },
        ..MatchmakingConfig::default()
    };

    let mut model = WengLinSkillModel::new(ExtendedWengLinConfig::default())?;
    for player in &roster {
        let prior = tier_pairing::SkillModel::initial_rating(&model, player);
        model.insert_rating(player.clone(), prior.mean, prior.uncertainty);
    }

    let store = InMemoryStore::new();
    let metrics = Arc::new(MetricsCollector::new()?);

    let mut sit_outs: BTreeMap<PlayerId, usize> = BTreeMap::new();
    let mut back_to_back = 0usize;
    let mut rematches = 0usize;
    let mut previous_pairs: HashSet<(PlayerId, PlayerId)> = HashSet::new();
    let mut previous_sit_out: Option<PlayerId> = None;

    println!(
        "Simulating {} rounds with {} players ({})",
        cli.rounds,
        cli.players,
        cli.strategy.algorithm_tag()
    );
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for round in 1..=cli.rounds {
        let matchmaker = Matchmaker::new(Arc::new(model.clone()), config.clone())?
            .with_metrics(metrics.clone());
        let outcome = matchmaker.run_round_with_store(&roster, &store, current_timestamp())?;
        let report = outcome.report;

        let mut pairs = HashSet::new();
        for m in &report.matches {
            let key = if m.player1 < m.player2 {
                (m.player1.clone(), m.player2.clone())
            } else {
                (m.player2.clone(), m.player1.clone())
            };
            if previous_pairs.contains(&key) {
                rematches += 1;
            }
            pairs.insert(key);

            let result = decide(&m.player1, &m.player2)?;
            model.record_outcome(&m.player1, &m.player2, result)?;
        }
        previous_pairs = pairs;

        if let Some(player) = &report.unmatched {
            *sit_outs.entry(player.clone()).or_default() += 1;
            if previous_sit_out.as_ref() == Some(player) {
                back_to_back += 1;
            }
        }
        previous_sit_out = report.unmatched.clone();

        if cli.verbose {
            println!(
                "Round {:>2}: {} tiers, sitting out {}",
                round,
                report.tiers.len(),
                report.unmatched.as_deref().unwrap_or("nobody")
            );
            for m in &report.matches {
                println!(
                    "    {} vs {} (avg {:.2}, cost {:.3})",
                    m.player1, m.player2, m.average_skill, m.pairing_cost
                );
            }
        }
    }

    let state = store.load()?.state;

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Back-to-back rematches: {}", rematches);
    println!("Back-to-back sit-outs:  {}", back_to_back);
    println!("Pairings in history:    {}", state.history.len());
    println!("Sit-outs per player:");
    for (player, count) in &sit_outs {
        println!("    {:<10} {}", player, count);
    }
    println!("Final ratings:");
    for player in &roster {
        if let Some(rating) = tier_pairing::SkillModel::rating_of(&model, player) {
            println!(
                "    {:<10} ordinal {:>6.2}  mean {:>6.2}  uncertainty {:>5.2}",
                player, rating.ordinal, rating.mean, rating.uncertainty
            );
        }
    }
    println!(
        "Matches recorded in metrics: {}",
        metrics.round().matches_total.get()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbours_share_strength() {
        let levels: Vec<usize> = (0..6)
            .map(|i| strength(&player_name(i)).unwrap())
            .collect();
        assert_eq!(levels, vec![0, 0, 1, 1, 2, 2]);
    }

    #[test]
    fn test_decide_follows_strength() {
        assert_eq!(decide("player01", "player02").unwrap(), MatchResult::Draw);
        assert_eq!(decide("player02", "player03").unwrap(), MatchResult::Win);
        assert_eq!(decide("player05", "player01").unwrap(), MatchResult::Loss);
    }

    #[test]
    fn test_malformed_ids_rejected() {
        assert!(strength("player00").is_err());
        assert!(strength("someone").is_err());
    }
}
