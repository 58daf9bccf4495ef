//! Lot — one open position fragment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single open quantity acquired at one price/time.
///
/// Owned exclusively by the position ledger: created on a buy fill, shrunk
/// or removed FIFO on sell fills, never resurrected. `size` only decreases
/// and never goes negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub price: f64,
    pub size: f64,
    pub timestamp: DateTime<Utc>,
}

impl Lot {
    pub fn new(price: f64, size: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            price,
            size,
            timestamp,
        }
    }

    /// Notional cost of the remaining size.
    pub fn cost(&self) -> f64 {
        self.price * self.size
    }
}
