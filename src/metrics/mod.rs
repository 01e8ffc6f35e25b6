//! Metrics for the pairing engine
//!
//! Prometheus counters, gauges and histograms describing processed rounds.

pub mod collector;

pub use collector::{MetricsCollector, PerformanceMetrics, RoundMetrics};
