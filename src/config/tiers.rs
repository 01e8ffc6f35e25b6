//! Skill tier configuration

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Human-readable tier names, highest skill first
pub const DEFAULT_TIER_LABELS: [&str; 6] = [
    "Elite",
    "Expert",
    "Advanced",
    "Intermediate",
    "Developing",
    "Novice",
];

/// Adaptive width and size bounds used when assembling tiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierConfig {
    /// Ordinal span allowed below the mid threshold
    pub default_width: f64,
    /// Span for tiers whose first player is above `mid_threshold`
    pub mid_width: f64,
    /// Span for tiers whose first player is above `top_threshold`
    pub top_width: f64,
    pub mid_threshold: f64,
    pub top_threshold: f64,
    /// Maximum number of players in a single tier
    pub max_tier_size: usize,
    /// Names handed out in descending-skill order
    pub labels: Vec<String>,
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            default_width: 3.0,
            mid_width: 2.5,
            top_width: 2.0,
            mid_threshold: 5.0,
            top_threshold: 15.0,
            max_tier_size: 6,
            labels: DEFAULT_TIER_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TierConfig {
    /// Ordinal width allowed for a tier that starts at `ordinal`.
    /// Narrows as skill rises.
    pub fn width_for(&self, ordinal: f64) -> f64 {
        if ordinal > self.top_threshold {
            self.top_width
        } else if ordinal > self.mid_threshold {
            self.mid_width
        } else {
            self.default_width
        }
    }

    /// Label for the tier at `index` (0 = highest skill)
    pub fn label_for(&self, index: usize) -> String {
        self.labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("Tier {}", index + 1))
    }

    /// Validate tier parameters
    pub fn validate(&self) -> Result<()> {
        if self.default_width <= 0.0 || self.mid_width <= 0.0 || self.top_width <= 0.0 {
            return Err(anyhow!("Tier widths must be positive"));
        }
        if self.top_width > self.mid_width || self.mid_width > self.default_width {
            return Err(anyhow!(
                "Tier widths must narrow with skill: top {} <= mid {} <= default {}",
                self.top_width,
                self.mid_width,
                self.default_width
            ));
        }
        if self.top_threshold <= self.mid_threshold {
            return Err(anyhow!(
                "Top tier threshold ({}) must be above the mid threshold ({})",
                self.top_threshold,
                self.mid_threshold
            ));
        }
        if self.max_tier_size == 0 {
            return Err(anyhow!("Max tier size must be greater than 0"));
        }
        Ok(())
    }
}
