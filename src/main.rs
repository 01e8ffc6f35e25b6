//! Command line entry point for the tier pairing engine
//!
//! Loads ratings and carry-over state from disk, runs a pairing round, prints
//! a console report and writes the round report as JSON. Also records game
//! results into the ratings book and previews skill tiers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tier_pairing::config::AppConfig;
use tier_pairing::history::{CarryOverStore, JsonFileStore};
use tier_pairing::metrics::MetricsCollector;
use tier_pairing::rating::{RatingBook, WengLinSkillModel};
use tier_pairing::tiers::SkillTier;
use tier_pairing::types::{MatchResult, PlayerId, RoundReport};
use tier_pairing::utils::{current_timestamp, parse_roster};
use tier_pairing::Matchmaker;
use tracing::{error, info};

/// Tier Pairing - skill-tiered 1v1 round pairings
#[derive(Parser)]
#[command(
    name = "tier-pairing",
    version,
    about = "Pair an active roster into skill-tiered 1v1 matches, round by round",
    long_about = "Tier Pairing groups players into skill tiers using Weng-Lin (OpenSkill) \
                 ratings, pairs them greedily by draw probability, discourages recent \
                 rematches and rotates the sit-out player when the roster is odd."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        global = true,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, global = true, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Print Prometheus metrics when done
    #[arg(long, global = true, help = "Print metrics in Prometheus text format on exit")]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pair the next round
    Pair {
        /// Active roster, one player id per line
        #[arg(short, long, value_name = "FILE")]
        roster: PathBuf,

        /// Where to write the JSON round report
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Compute and print the round without saving anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Record a finished game into the ratings book
    Record {
        #[arg(long)]
        player1: String,

        #[arg(long)]
        player2: String,

        /// Result from player1's point of view: win, loss or draw
        #[arg(long)]
        result: MatchResult,
    },
    /// Show how a roster splits into skill tiers
    Tiers {
        #[arg(short, long, value_name = "FILE")]
        roster: PathBuf,
    },
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from file, environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    Ok(config)
}

fn read_roster(path: &Path) -> Result<Vec<PlayerId>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster {}", path.display()))?;
    let roster = parse_roster(&contents);
    info!("Loaded {} players from {}", roster.len(), path.display());
    Ok(roster)
}

fn load_model(config: &AppConfig) -> Result<WengLinSkillModel> {
    let book = RatingBook::load(&config.storage.ratings_path)?;
    WengLinSkillModel::with_book(config.rating.clone(), book)
}

fn print_report(report: &RoundReport) {
    println!("Round {} ({})", report.round_id, report.algorithm);
    println!("  Generated: {}", report.generated_at.to_rfc3339());
    println!("  Active players: {}", report.total_players);
    for (i, m) in report.matches.iter().enumerate() {
        println!(
            "  {:>3}. {} vs {}  (avg {:.2}, diff {:.2}, confidence {:.3}, cost {:.3})",
            i + 1,
            m.player1,
            m.player2,
            m.average_skill,
            m.skill_difference,
            m.confidence,
            m.pairing_cost
        );
    }
    match &report.unmatched {
        Some(player) => println!("  Sitting out: {}", player),
        None => println!("  Sitting out: nobody"),
    }
    for warning in &report.warnings {
        println!("  Warning: {}", warning);
    }
}

fn print_tiers(tiers: &[SkillTier]) {
    for tier in tiers {
        println!(
            "{} [{:.2} .. {:.2}]",
            tier.label, tier.min_ordinal, tier.max_ordinal
        );
        for player in &tier.players {
            println!(
                "  {:<24} ordinal {:>7.2}  mean {:>7.2}  uncertainty {:>5.2}",
                player.player, player.ordinal, player.mean, player.uncertainty
            );
        }
    }
}

fn run_pair(
    config: &AppConfig,
    metrics: Arc<MetricsCollector>,
    roster_path: &Path,
    output: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    let roster = read_roster(roster_path)?;
    let model = load_model(config)?;
    let matchmaker = Matchmaker::new(Arc::new(model), config.matchmaking.clone())?
        .with_metrics(metrics);
    let store = JsonFileStore::new(&config.storage.state_path);
    let now = current_timestamp();

    let outcome = if dry_run {
        matchmaker.run_round_loaded(&roster, store.load()?, now)?
    } else {
        matchmaker.run_round_with_store(&roster, &store, now)?
    };

    print_report(&outcome.report);

    if dry_run {
        info!("Dry run - state and report left untouched");
        return Ok(());
    }

    let report_path = output.unwrap_or_else(|| config.storage.report_path.clone());
    let json = serde_json::to_string_pretty(&outcome.report)?;
    std::fs::write(&report_path, json)
        .with_context(|| format!("Failed to write report {}", report_path.display()))?;
    info!("Round report written to {}", report_path.display());

    Ok(())
}

fn run_record(config: &AppConfig, player1: &str, player2: &str, result: MatchResult) -> Result<()> {
    let mut model = load_model(config)?;
    let (rating1, rating2) = model.record_outcome(player1, player2, result)?;
    model.book().save(&config.storage.ratings_path)?;

    for rating in [rating1, rating2] {
        println!(
            "{}: mean {:.2}, uncertainty {:.2}, ordinal {:.2}",
            rating.player, rating.mean, rating.uncertainty, rating.ordinal
        );
    }
    Ok(())
}

fn run_tiers(config: &AppConfig, roster_path: &Path) -> Result<()> {
    let roster = read_roster(roster_path)?;
    let model = load_model(config)?;
    let matchmaker = Matchmaker::new(Arc::new(model), config.matchmaking.clone())?;
    print_tiers(&matchmaker.preview_tiers(&roster)?);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let metrics = Arc::new(MetricsCollector::new()?);

    let result = match &args.command {
        Command::Pair {
            roster,
            output,
            dry_run,
        } => run_pair(&config, metrics.clone(), roster, output.clone(), *dry_run),
        Command::Record {
            player1,
            player2,
            result,
        } => run_record(&config, player1, player2, *result),
        Command::Tiers { roster } => run_tiers(&config, roster),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }

    if args.metrics {
        print!("{}", metrics.export_text()?);
    }

    Ok(())
}
