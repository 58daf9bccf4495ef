//! Position ledger — FIFO lot tracking and realized P&L accounting.
//!
//! Lots are consumed oldest-first on sells. A partially consumed lot has
//! its size reduced in place; a fully consumed lot is removed and never
//! resurrected. The sum of remaining lot sizes must match the portfolio's
//! reported open quantity — that consistency is the caller's contract,
//! maintained by reporting every fill back.

use crate::domain::Lot;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use tracing::{info, warn};

/// Ordered collection of open lots plus cumulative trade counters.
#[derive(Debug, Clone, Default)]
pub struct PositionLedger {
    lots: VecDeque<Lot>,
    total_trades: u64,
    winning_trades: u64,
    realized_pnl: f64,
}

impl PositionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a buy fill: append a new lot, count the trade.
    pub fn record_buy(&mut self, price: f64, size: f64, timestamp: DateTime<Utc>) {
        self.lots.push_back(Lot::new(price, size, timestamp));
        self.total_trades += 1;
        info!(price, size, notional = price * size, "buy recorded");
    }

    /// Record a sell fill, consuming lots oldest-first.
    ///
    /// Returns the realized P&L of this call. A request exceeding the open
    /// quantity is a caller contract violation: it is logged and clamped to
    /// the available quantity rather than raised, since replay and live
    /// execution both commonly clamp externally.
    pub fn record_sell(&mut self, price: f64, size: f64, _timestamp: DateTime<Utc>) -> f64 {
        let open = self.open_quantity();
        let mut remaining = size;
        if remaining > open {
            warn!(
                requested = size,
                open, "sell size exceeds open quantity; clamping"
            );
            remaining = open;
        }

        let mut pnl = 0.0;
        while remaining > 0.0 {
            let Some(lot) = self.lots.front_mut() else {
                break;
            };
            if lot.size <= remaining {
                pnl += (price - lot.price) * lot.size;
                remaining -= lot.size;
                self.lots.pop_front();
            } else {
                pnl += (price - lot.price) * remaining;
                lot.size -= remaining;
                remaining = 0.0;
            }
        }

        self.realized_pnl += pnl;
        self.total_trades += 1;
        if pnl > 0.0 {
            self.winning_trades += 1;
        }
        info!(price, size, pnl, "sell recorded");
        pnl
    }

    /// Size-weighted average entry price of the remaining lots.
    ///
    /// Falls back to `current_price` when flat, so downstream percentage
    /// math never divides by zero.
    pub fn average_entry_price(&self, current_price: f64) -> f64 {
        let total_size = self.open_quantity();
        if total_size <= 0.0 {
            return current_price;
        }
        let total_cost: f64 = self.lots.iter().map(Lot::cost).sum();
        total_cost / total_size
    }

    /// Sum of remaining lot sizes.
    pub fn open_quantity(&self) -> f64 {
        self.lots.iter().map(|lot| lot.size).sum()
    }

    pub fn has_open_lots(&self) -> bool {
        !self.lots.is_empty()
    }

    pub fn total_trades(&self) -> u64 {
        self.total_trades
    }

    pub fn winning_trades(&self) -> u64 {
        self.winning_trades
    }

    pub fn realized_pnl(&self) -> f64 {
        self.realized_pnl
    }

    /// Snapshot of the open lots, oldest first.
    pub fn lots(&self) -> Vec<Lot> {
        self.lots.iter().cloned().collect()
    }

    /// Rebuild a ledger from exported state.
    pub fn from_parts(
        lots: Vec<Lot>,
        total_trades: u64,
        winning_trades: u64,
        realized_pnl: f64,
    ) -> Self {
        Self {
            lots: lots.into(),
            total_trades,
            winning_trades,
            realized_pnl,
        }
    }
}
