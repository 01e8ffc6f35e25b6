//! Metrics collection using Prometheus
//!
//! Round-level counters and distributions for the pairing engine, kept in a
//! private registry so several matchmakers can coexist in one process.

use crate::types::RoundReport;
use anyhow::Result;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;
use std::time::Duration;

/// Main metrics collector for the pairing engine
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Round outcome metrics
    round_metrics: RoundMetrics,

    /// Performance metrics
    performance_metrics: PerformanceMetrics,
}

/// Round outcome metrics
#[derive(Clone)]
pub struct RoundMetrics {
    /// Rounds processed, by algorithm tag
    pub rounds_total: IntCounterVec,

    /// Matches created across all rounds
    pub matches_total: IntCounter,

    /// Rounds that ended with a sit-out player
    pub sit_outs_total: IntCounter,

    /// Warnings raised, by kind
    pub warnings_total: IntCounterVec,

    /// Number of tiers in the most recent round
    pub tiers_built: IntGauge,

    /// Active players in the most recent round
    pub active_players: IntGauge,
}

/// Performance metrics
#[derive(Clone)]
pub struct PerformanceMetrics {
    /// Cost of each selected pairing
    pub pairing_cost: Histogram,

    /// Wall time spent producing a round
    pub round_duration: Histogram,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let round_metrics = RoundMetrics::new(&registry)?;
        let performance_metrics = PerformanceMetrics::new(&registry)?;

        Ok(Self {
            registry,
            round_metrics,
            performance_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    pub fn round(&self) -> &RoundMetrics {
        &self.round_metrics
    }

    pub fn performance(&self) -> &PerformanceMetrics {
        &self.performance_metrics
    }

    /// Record a completed round
    pub fn record_round(&self, report: &RoundReport, tier_count: usize, duration: Duration) {
        self.round_metrics
            .rounds_total
            .with_label_values(&[report.algorithm.as_str()])
            .inc();

        self.round_metrics
            .matches_total
            .inc_by(report.matches.len() as u64);

        if report.unmatched.is_some() {
            self.round_metrics.sit_outs_total.inc();
        }

        for warning in &report.warnings {
            self.round_metrics
                .warnings_total
                .with_label_values(&[warning.kind()])
                .inc();
        }

        self.round_metrics.tiers_built.set(tier_count as i64);
        self.round_metrics
            .active_players
            .set(report.total_players as i64);

        for m in &report.matches {
            self.performance_metrics.pairing_cost.observe(m.pairing_cost);
        }

        self.performance_metrics
            .round_duration
            .observe(duration.as_secs_f64());
    }

    /// Export all metrics in the Prometheus text format
    pub fn export_text(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

impl RoundMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let rounds_total = IntCounterVec::new(
            Opts::new("pairing_rounds_total", "Rounds processed"),
            &["algorithm"],
        )?;
        let matches_total = IntCounter::new("pairing_matches_total", "Matches created")?;
        let sit_outs_total =
            IntCounter::new("pairing_sit_outs_total", "Rounds ending with a sit-out")?;
        let warnings_total = IntCounterVec::new(
            Opts::new("pairing_warnings_total", "Round warnings raised"),
            &["kind"],
        )?;
        let tiers_built = IntGauge::new("pairing_tiers_built", "Tiers in the latest round")?;
        let active_players =
            IntGauge::new("pairing_active_players", "Active players in the latest round")?;

        registry.register(Box::new(rounds_total.clone()))?;
        registry.register(Box::new(matches_total.clone()))?;
        registry.register(Box::new(sit_outs_total.clone()))?;
        registry.register(Box::new(warnings_total.clone()))?;
        registry.register(Box::new(tiers_built.clone()))?;
        registry.register(Box::new(active_players.clone()))?;

        Ok(Self {
            rounds_total,
            matches_total,
            sit_outs_total,
            warnings_total,
            tiers_built,
            active_players,
        })
    }
}

impl PerformanceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let pairing_cost = Histogram::with_opts(
            HistogramOpts::new("pairing_cost", "Cost of selected pairings")
                .buckets(vec![0.05, 0.1, 0.2, 0.3, 0.5, 0.75, 1.0, 1.5, 2.0]),
        )?;
        let round_duration = Histogram::with_opts(
            HistogramOpts::new("pairing_round_duration_seconds", "Time to produce a round")
                .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        )?;

        registry.register(Box::new(pairing_cost.clone()))?;
        registry.register(Box::new(round_duration.clone()))?;

        Ok(Self {
            pairing_cost,
            round_duration,
        })
    }
}
