//! Pairing cost and round behaviour configuration

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Which pairing algorithm variant to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingStrategy {
    /// Build skill tiers and penalise cross-tier pairings
    #[default]
    TierAware,
    /// Skip tiers; cost is draw probability plus recency only
    TierNaive,
}

impl PairingStrategy {
    /// Tag written into round reports
    pub fn algorithm_tag(&self) -> &'static str {
        match self {
            PairingStrategy::TierAware => "tier_aware_greedy",
            PairingStrategy::TierNaive => "greedy",
        }
    }

    /// Recency penalty used when none is configured explicitly
    pub fn default_recency_penalty(&self) -> f64 {
        match self {
            PairingStrategy::TierAware => 0.1,
            PairingStrategy::TierNaive => 0.2,
        }
    }
}

impl std::str::FromStr for PairingStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "tier_aware" | "tiered" => Ok(PairingStrategy::TierAware),
            "tier_naive" | "greedy" => Ok(PairingStrategy::TierNaive),
            other => Err(anyhow!("Unknown pairing strategy: {}", other)),
        }
    }
}

/// What to do with a rostered player the rating model has never seen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingRatingPolicy {
    /// Give the player the model's prior and raise a warning
    #[default]
    UseDefault,
    /// Abort the round
    Fail,
}

impl std::str::FromStr for MissingRatingPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "use_default" | "default" => Ok(MissingRatingPolicy::UseDefault),
            "fail" => Ok(MissingRatingPolicy::Fail),
            other => Err(anyhow!("Unknown missing rating policy: {}", other)),
        }
    }
}

/// Penalty added for pairing players `gap` tiers apart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierPenaltyTable {
    pub adjacent: f64,
    pub two_apart: f64,
    pub three_apart: f64,
    /// Penalty at a gap of four tiers
    pub distant_base: f64,
    /// Added for every tier beyond four
    pub distant_step: f64,
}

impl Default for TierPenaltyTable {
    fn default() -> Self {
        Self {
            adjacent: 0.15,
            two_apart: 0.35,
            three_apart: 0.60,
            distant_base: 0.8,
            distant_step: 0.2,
        }
    }
}

impl TierPenaltyTable {
    pub fn penalty(&self, gap: usize) -> f64 {
        match gap {
            0 => 0.0,
            1 => self.adjacent,
            2 => self.two_apart,
            3 => self.three_apart,
            n => self.distant_base + self.distant_step * (n - 4) as f64,
        }
    }

    fn validate(&self) -> Result<()> {
        let steps = [
            0.0,
            self.adjacent,
            self.two_apart,
            self.three_apart,
            self.distant_base,
        ];
        if steps.windows(2).any(|w| w[1] < w[0]) {
            return Err(anyhow!("Tier penalties must not decrease with distance"));
        }
        if self.distant_step <= 0.0 {
            return Err(anyhow!("Distant tier penalty step must be positive"));
        }
        Ok(())
    }
}

/// Cost function and round-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingConfig {
    pub strategy: PairingStrategy,
    pub tier_penalties: TierPenaltyTable,
    /// Overrides the strategy's recency penalty when set
    pub recency_penalty: Option<f64>,
    /// History window is `lookback_rounds * 15` pairings
    pub lookback_rounds: usize,
    pub missing_rating: MissingRatingPolicy,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            strategy: PairingStrategy::TierAware,
            tier_penalties: TierPenaltyTable::default(),
            recency_penalty: None,
            lookback_rounds: 3,
            missing_rating: MissingRatingPolicy::UseDefault,
        }
    }
}

impl PairingConfig {
    /// Configuration for the tier-naive variant
    pub fn tier_naive() -> Self {
        Self {
            strategy: PairingStrategy::TierNaive,
            ..Self::default()
        }
    }

    pub fn effective_recency_penalty(&self) -> f64 {
        self.recency_penalty
            .unwrap_or_else(|| self.strategy.default_recency_penalty())
    }

    /// Validate pairing parameters
    pub fn validate(&self) -> Result<()> {
        self.tier_penalties.validate()?;
        if self.effective_recency_penalty() < 0.0 {
            return Err(anyhow!("Recency penalty must be non-negative"));
        }
        if self.lookback_rounds == 0 {
            return Err(anyhow!("Lookback rounds must be greater than 0"));
        }
        Ok(())
    }
}
