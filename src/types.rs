//! Common types used throughout the pairing engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for players
pub type PlayerId = String;

/// Unique identifier for a processed round
pub type RoundId = Uuid;

/// Skill snapshot for one player, as produced by the rating model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRating {
    pub player: PlayerId,
    pub mean: f64,
    pub uncertainty: f64,
    /// Conservative scalar used for ranking and tier assembly
    pub ordinal: f64,
}

impl PlayerRating {
    /// Build a rating whose ordinal is the usual `mean - 3 * uncertainty`
    pub fn new(player: impl Into<PlayerId>, mean: f64, uncertainty: f64) -> Self {
        Self {
            player: player.into(),
            mean,
            uncertainty,
            ordinal: mean - 3.0 * uncertainty,
        }
    }

    /// Build a rating with an ordinal supplied by the rating model
    pub fn with_ordinal(
        player: impl Into<PlayerId>,
        mean: f64,
        uncertainty: f64,
        ordinal: f64,
    ) -> Self {
        Self {
            player: player.into(),
            mean,
            uncertainty,
            ordinal,
        }
    }

    /// 99.7% lower confidence bound on the player's skill
    pub fn conservative_estimate(&self) -> f64 {
        self.mean - 3.0 * self.uncertainty
    }
}

/// A head-to-head pairing produced for a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub player1: PlayerId,
    pub player2: PlayerId,
    pub skill_difference: f64,
    pub average_skill: f64,
    /// Inverse of the mean uncertainty; higher when both ratings are settled
    pub confidence: f64,
    /// Cost that selected this pairing (lower is better)
    pub pairing_cost: f64,
}

impl Match {
    /// Whether this match involves the given player
    pub fn involves(&self, player: &str) -> bool {
        self.player1 == player || self.player2 == player
    }
}

/// A pairing retained in the rolling history window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPairing {
    pub player1: PlayerId,
    pub player2: PlayerId,
    pub timestamp: DateTime<Utc>,
}

impl HistoricalPairing {
    /// Unordered comparison against a pair of players
    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.player1 == a && self.player2 == b) || (self.player1 == b && self.player2 == a)
    }
}

/// State carried from one round's output into the next round's input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub previously_sat_out: Option<PlayerId>,
}

/// Recoverable conditions surfaced alongside a completed round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoundWarning {
    /// Player had no rating and was given the model's prior
    DefaultRatingUsed { player_id: PlayerId },
    /// Persisted carry-over state could not be read and was reset
    StateRecovered { reason: String },
    /// The same player sits out two rounds in a row
    RepeatedSitOut { player_id: PlayerId },
}

impl RoundWarning {
    /// Short label used for logging and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            RoundWarning::DefaultRatingUsed { .. } => "default_rating_used",
            RoundWarning::StateRecovered { .. } => "state_recovered",
            RoundWarning::RepeatedSitOut { .. } => "repeated_sit_out",
        }
    }
}

impl std::fmt::Display for RoundWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundWarning::DefaultRatingUsed { player_id } => {
                write!(f, "no rating for {}, using the default prior", player_id)
            }
            RoundWarning::StateRecovered { reason } => {
                write!(f, "carry-over state reset: {}", reason)
            }
            RoundWarning::RepeatedSitOut { player_id } => {
                write!(f, "{} sits out for a second round in a row", player_id)
            }
        }
    }
}

/// Tier membership as reported for a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierSummary {
    pub label: String,
    pub players: Vec<PlayerId>,
    pub min_ordinal: f64,
    pub max_ordinal: f64,
}

/// Everything the reporting side needs about a finished round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundReport {
    pub round_id: RoundId,
    pub generated_at: DateTime<Utc>,
    pub algorithm: String,
    pub total_players: usize,
    pub matches: Vec<Match>,
    pub unmatched: Option<PlayerId>,
    pub tiers: Vec<TierSummary>,
    pub warnings: Vec<RoundWarning>,
}

/// Result of a 1v1 game from player1's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    Win,
    Loss,
    Draw,
}

impl std::str::FromStr for MatchResult {
    type Err = crate::error::PairingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "win" | "1" => Ok(MatchResult::Win),
            "loss" | "0" => Ok(MatchResult::Loss),
            "draw" | "0.5" => Ok(MatchResult::Draw),
            other => Err(crate::error::PairingError::InvalidOutcome {
                reason: format!("unknown result '{}', expected win, loss or draw", other),
            }),
        }
    }
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchResult::Win => write!(f, "win"),
            MatchResult::Loss => write!(f, "loss"),
            MatchResult::Draw => write!(f, "draw"),
        }
    }
}
