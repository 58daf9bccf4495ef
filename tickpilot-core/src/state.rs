//! Serializable strategy state snapshot.
//!
//! Enables a process restart without losing indicator warm-up or risk
//! state: open lots, peak portfolio value, throttle timer, trade counters,
//! realized P&L, and the bounded price/EMA histories. Import re-imposes
//! the buffer caps exactly (100 prices, 50 EMA pairs) so indicator windows
//! align identically with an uninterrupted run.

use crate::domain::Lot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Complete exportable engine state.
///
/// `config_fingerprint` ties the snapshot to the configuration that
/// produced it; importing under a different config is refused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyState {
    pub config_fingerprint: String,

    // ── Ledger ──
    pub lots: Vec<Lot>,
    pub total_trades: u64,
    pub winning_trades: u64,
    pub realized_pnl: f64,

    // ── Risk ──
    pub peak_value: Option<f64>,
    pub last_trade: Option<DateTime<Utc>>,

    // ── Indicator warm-up ──
    pub price_history: Vec<f64>,
    pub ema_fast_history: Vec<f64>,
    pub ema_slow_history: Vec<f64>,
}
