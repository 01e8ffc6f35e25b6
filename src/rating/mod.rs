//! Rating system integration using Weng-Lin (OpenSkill) algorithm
//!
//! This module defines the skill model interface the pairing engine consumes,
//! a Weng-Lin implementation of it, and the persistent ratings book.

pub mod model;
pub mod storage;
pub mod weng_lin;

// Re-export commonly used types
pub use model::SkillModel;
pub use storage::{RatingBook, RatingEntry};
pub use weng_lin::{ExtendedWengLinConfig, WengLinSkillModel};
