//! Skill tiers
//!
//! Tiers group closely matched players for the current round only; nothing
//! here persists between rounds.

pub mod builder;

pub use builder::{SkillTier, TierBuilder, TierIndex};
