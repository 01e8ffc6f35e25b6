//! Round orchestration
//!
//! A round takes a roster and the carry-over state from the previous round,
//! and returns the report plus the carry-over state for the next one. The
//! matchmaker itself holds no mutable state between rounds.

use crate::config::{MatchmakingConfig, MissingRatingPolicy, PairingStrategy};
use crate::error::{PairingError, Result};
use crate::history::{CarryOverState, CarryOverStore, LoadedState};
use crate::metrics::MetricsCollector;
use crate::pairing::carry_over::CarryOverPolicy;
use crate::pairing::cost::PairingCostFunction;
use crate::pairing::engine::GreedyPairingEngine;
use crate::rating::SkillModel;
use crate::tiers::{SkillTier, TierBuilder, TierIndex};
use crate::types::{PlayerId, PlayerRating, RoundReport, RoundState, RoundWarning};
use crate::utils::{find_duplicate, generate_round_id};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// A finished round
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    pub report: RoundReport,
    /// Tiers used for this round; empty under the tier-naive strategy
    pub tiers: Vec<SkillTier>,
    /// State to hand to the next round
    pub carry_over: CarryOverState,
}

/// Runs pairing rounds against an injected skill model
pub struct Matchmaker {
    model: Arc<dyn SkillModel>,
    config: MatchmakingConfig,
    tier_builder: TierBuilder,
    carry_over_policy: CarryOverPolicy,
    engine: GreedyPairingEngine,
    metrics: Option<Arc<MetricsCollector>>,
}

impl Matchmaker {
    pub fn new(model: Arc<dyn SkillModel>, config: MatchmakingConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            model,
            tier_builder: TierBuilder::new(config.tiers.clone()),
            carry_over_policy: CarryOverPolicy::new(),
            engine: GreedyPairingEngine::new(PairingCostFunction::new(&config.pairing)),
            config,
            metrics: None,
        })
    }

    /// Record every round into the given collector
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &MatchmakingConfig {
        &self.config
    }

    pub fn algorithm_tag(&self) -> &'static str {
        self.config.pairing.strategy.algorithm_tag()
    }

    /// Look up every rostered player, applying the missing-rating policy.
    ///
    /// Duplicate identifiers abort the round.
    pub fn resolve_ratings(
        &self,
        roster: &[PlayerId],
    ) -> Result<(Vec<PlayerRating>, Vec<RoundWarning>)> {
        if let Some(duplicate) = find_duplicate(roster) {
            return Err(PairingError::DuplicatePlayer {
                player_id: duplicate.to_string(),
            }
            .into());
        }

        let mut ratings = Vec::with_capacity(roster.len());
        let mut warnings = Vec::new();

        for player in roster {
            match self.model.rating_of(player) {
                Some(rating) => ratings.push(rating),
                None => match self.config.pairing.missing_rating {
                    MissingRatingPolicy::UseDefault => {
                        let warning = RoundWarning::DefaultRatingUsed {
                            player_id: player.clone(),
                        };
                        warn!("{}", warning);
                        warnings.push(warning);
                        ratings.push(self.model.initial_rating(player));
                    }
                    MissingRatingPolicy::Fail => {
                        return Err(PairingError::UnknownPlayer {
                            player_id: player.clone(),
                        }
                        .into());
                    }
                },
            }
        }

        Ok((ratings, warnings))
    }

    fn build_tiers(&self, ratings: &[PlayerRating]) -> Vec<SkillTier> {
        match self.config.pairing.strategy {
            PairingStrategy::TierAware => self.tier_builder.build(ratings),
            PairingStrategy::TierNaive => Vec::new(),
        }
    }

    /// Tiers the roster would be split into, without running a round
    pub fn preview_tiers(&self, roster: &[PlayerId]) -> Result<Vec<SkillTier>> {
        let (ratings, _) = self.resolve_ratings(roster)?;
        Ok(self.tier_builder.build(&ratings))
    }

    /// Pair one round.
    ///
    /// `carry_over` is consumed; the returned outcome holds its successor.
    pub fn run_round(
        &self,
        roster: &[PlayerId],
        carry_over: CarryOverState,
        now: DateTime<Utc>,
    ) -> Result<RoundOutcome> {
        let started = Instant::now();
        let (ratings, mut warnings) = self.resolve_ratings(roster)?;

        let tiers = self.build_tiers(&ratings);
        let tier_index = TierIndex::new(&tiers);

        let CarryOverState {
            mut history,
            round: previous_round,
        } = carry_over;
        history.set_lookback_rounds(self.config.pairing.lookback_rounds);

        let decision = self
            .carry_over_policy
            .apply(ratings, previous_round.previously_sat_out.as_deref());
        if decision.repeated {
            if let Some(sit_out) = &decision.sit_out {
                warnings.push(RoundWarning::RepeatedSitOut {
                    player_id: sit_out.player.clone(),
                });
            }
        }

        let matches = self
            .engine
            .pair(&decision.to_pair, &tier_index, &history, self.model.as_ref());
        history.record_round(&matches, now);

        let unmatched = decision.sit_out.map(|p| p.player);
        let report = RoundReport {
            round_id: generate_round_id(),
            generated_at: now,
            algorithm: self.algorithm_tag().to_string(),
            total_players: roster.len(),
            matches,
            unmatched: unmatched.clone(),
            tiers: tiers.iter().map(SkillTier::summary).collect(),
            warnings,
        };

        info!(
            "Round {}: {} players, {} matches, {} tiers, sit-out {}",
            report.round_id,
            report.total_players,
            report.matches.len(),
            tiers.len(),
            unmatched.as_deref().unwrap_or("none")
        );

        if let Some(metrics) = &self.metrics {
            metrics.record_round(&report, tiers.len(), started.elapsed());
        }

        Ok(RoundOutcome {
            report,
            tiers,
            carry_over: CarryOverState {
                history,
                round: RoundState {
                    previously_sat_out: unmatched,
                },
            },
        })
    }

    /// Run a round from already loaded state.
    ///
    /// Warnings raised while loading come first in the report and are
    /// counted like any other round warning. Nothing is saved.
    pub fn run_round_loaded(
        &self,
        roster: &[PlayerId],
        loaded: LoadedState,
        now: DateTime<Utc>,
    ) -> Result<RoundOutcome> {
        let LoadedState {
            state,
            warnings: mut load_warnings,
        } = loaded;
        let mut outcome = self.run_round(roster, state, now)?;

        if !load_warnings.is_empty() {
            if let Some(metrics) = &self.metrics {
                for warning in &load_warnings {
                    metrics
                        .round()
                        .warnings_total
                        .with_label_values(&[warning.kind()])
                        .inc();
                }
            }
            load_warnings.append(&mut outcome.report.warnings);
            outcome.report.warnings = load_warnings;
        }

        Ok(outcome)
    }

    /// Load state from `store`, run a round, and save the new state.
    pub fn run_round_with_store(
        &self,
        roster: &[PlayerId],
        store: &dyn CarryOverStore,
        now: DateTime<Utc>,
    ) -> Result<RoundOutcome> {
        let outcome = self.run_round_loaded(roster, store.load()?, now)?;
        store.save(&outcome.carry_over)?;
        Ok(outcome)
    }
}
