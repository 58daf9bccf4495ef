//! TickPilot CLI — replay a tick stream through the signal engine.
//!
//! Commands:
//! - `run` — feed a CSV of `timestamp,price` rows through a strategy,
//!   applying each non-hold decision as an immediate fill at the tick
//!   price, and emit one JSON decision record per tick on stdout
//! - `default-config` — print the default strategy configuration as TOML
//!
//! This binary is a minimal demonstration host: real drivers own their own
//! execution, scheduling, and persistence and talk to the engine through
//! the same evaluate/report-fill/state interfaces used here.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tickpilot_core::{
    Action, FillReport, MarketSnapshot, PortfolioSnapshot, Strategy, StrategyConfig,
    StrategyRegistry,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "tickpilot", about = "TickPilot — adaptive momentum signal engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a CSV tick stream with immediate simulated fills.
    Run {
        /// CSV file with `timestamp,price` rows (RFC 3339 timestamps).
        #[arg(long)]
        ticks: PathBuf,

        /// TOML strategy configuration. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Strategy name in the registry.
        #[arg(long, default_value = "adaptive_momentum")]
        strategy: String,

        /// Starting cash balance.
        #[arg(long, default_value_t = 10_000.0)]
        cash: f64,
    },
    /// Print the default strategy configuration as TOML.
    DefaultConfig,
}

/// One CSV input row.
#[derive(Debug, Deserialize)]
struct TickRow {
    timestamp: DateTime<Utc>,
    price: f64,
}

/// One JSON output record per tick.
#[derive(Debug, Serialize)]
struct DecisionRecord {
    timestamp: DateTime<Utc>,
    price: f64,
    action: Action,
    size: f64,
    reason: String,
    cash: f64,
    quantity: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            ticks,
            config,
            strategy,
            cash,
        } => run(&ticks, config.as_deref(), &strategy, cash),
        Commands::DefaultConfig => {
            let toml = toml::to_string_pretty(&StrategyConfig::default())?;
            print!("{toml}");
            Ok(())
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<StrategyConfig> {
    let config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => StrategyConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn run(ticks: &std::path::Path, config: Option<&std::path::Path>, name: &str, cash: f64) -> Result<()> {
    if cash <= 0.0 {
        bail!("starting cash must be positive (got {cash})");
    }

    let config = load_config(config)?;
    let registry = StrategyRegistry::with_builtins();
    let mut strategy = registry
        .create(name, &config)
        .with_context(|| format!("constructing strategy {name:?}"))?;

    let mut reader = csv::Reader::from_path(ticks)
        .with_context(|| format!("opening tick file {}", ticks.display()))?;

    let mut cash = cash;
    let mut quantity = 0.0_f64;
    let mut last_price = 0.0_f64;
    let mut ticks_seen = 0usize;
    let mut fills = 0usize;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for row in reader.deserialize() {
        let row: TickRow = row.context("reading tick row")?;
        if !(row.price > 0.0 && row.price.is_finite()) {
            bail!("tick {} has non-positive price {}", ticks_seen, row.price);
        }
        ticks_seen += 1;
        last_price = row.price;

        let market = MarketSnapshot::new(row.price, row.timestamp);
        let portfolio = PortfolioSnapshot::new(cash, quantity);
        let signal = strategy.evaluate(&market, &portfolio);

        // Immediate fill at tick price, clamped to what the portfolio
        // actually supports.
        let executed = match signal.action {
            Action::Buy => {
                let size = signal.size.min(cash / row.price);
                if size > 0.0 {
                    cash -= size * row.price;
                    quantity += size;
                    Some(size)
                } else {
                    None
                }
            }
            Action::Sell => {
                let size = signal.size.min(quantity);
                if size > 0.0 {
                    cash += size * row.price;
                    quantity -= size;
                    Some(size)
                } else {
                    None
                }
            }
            Action::Hold => None,
        };

        if let Some(size) = executed {
            fills += 1;
            strategy.report_fill(&FillReport {
                action: signal.action,
                price: row.price,
                size,
                timestamp: row.timestamp,
            });
        }

        let record = DecisionRecord {
            timestamp: row.timestamp,
            price: row.price,
            action: signal.action,
            size: signal.size,
            reason: signal.reason,
            cash,
            quantity,
        };
        serde_json::to_writer(&mut out, &record)?;
        writeln!(out)?;
    }

    if ticks_seen == 0 {
        bail!("tick file {} contained no rows", ticks.display());
    }

    let state = strategy.export_state();
    let equity = cash + quantity * last_price;
    let win_rate = if state.total_trades > 0 {
        state.winning_trades as f64 / state.total_trades as f64 * 100.0
    } else {
        0.0
    };
    info!(
        ticks = ticks_seen,
        fills,
        trades = state.total_trades,
        win_rate_pct = win_rate,
        realized_pnl = state.realized_pnl,
        final_equity = equity,
        "replay complete"
    );

    Ok(())
}
