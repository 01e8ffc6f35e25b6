//! Utility functions for the pairing engine

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use uuid::Uuid;

/// Generate a new unique round ID
pub fn generate_round_id() -> Uuid {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Calculate the absolute difference between two ordinals
pub fn rating_difference(rating1: f64, rating2: f64) -> f64 {
    (rating1 - rating2).abs()
}

/// Return the first identifier that appears more than once, if any
pub fn find_duplicate<'a, I>(ids: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut seen = HashSet::new();
    ids.into_iter()
        .find(|id| !seen.insert(id.as_str()))
        .map(|id| id.as_str())
}

/// Parse a roster file: one identifier per line, blanks and `#` comments skipped
pub fn parse_roster(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
