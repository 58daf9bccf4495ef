//! TickPilot Core — single-instrument signal engine.
//!
//! This crate contains the heart of the trading engine:
//! - Domain types (signals, lots, fill reports, market/portfolio views)
//! - Pure indicator functions (RSI, EMA, MACD, Bollinger Bands, volatility)
//! - Bounded rolling price/EMA history
//! - FIFO position ledger with realized P&L accounting
//! - Risk governor (drawdown ceiling + trade throttle)
//! - Multi-signal decision engine with volatility-scaled sizing
//! - Serializable state snapshots for restart without indicator warm-up
//! - Explicit strategy registry for host-owned construction
//!
//! The crate is pure computation over in-memory state: one `evaluate` call
//! per tick, one `report_fill` call per execution, strictly sequential per
//! instrument. Multiple instruments get independent engine instances.

pub mod config;
pub mod domain;
pub mod engine;
pub mod history;
pub mod indicators;
pub mod ledger;
pub mod registry;
pub mod risk;
pub mod state;

pub use config::{ConfigError, StrategyConfig};
pub use domain::{
    Action, FillReport, Lot, MarketSnapshot, MarketView, PortfolioSnapshot, PortfolioView, Signal,
};
pub use engine::{AdaptiveMomentum, Strategy};
pub use registry::{RegistryError, StrategyRegistry};
pub use state::StrategyState;
