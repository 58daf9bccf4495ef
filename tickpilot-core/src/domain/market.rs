//! Market view — the narrow capability interface the engine reads per tick.

use chrono::{DateTime, Utc};

/// What the engine needs to know about the market on one tick.
///
/// Any concrete implementation satisfying this shape is acceptable; the
/// engine never downcasts. `recent_prices` is only consulted on a cold
/// start (empty history buffer) to seed indicator warm-up after a restart,
/// and may be empty.
pub trait MarketView {
    fn price(&self) -> f64;
    fn timestamp(&self) -> DateTime<Utc>;
    fn recent_prices(&self) -> &[f64];
}

/// Plain-struct market snapshot for drivers that already hold the values.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    pub price: f64,
    pub timestamp: DateTime<Utc>,
    pub recent_prices: Vec<f64>,
}

impl MarketSnapshot {
    pub fn new(price: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            price,
            timestamp,
            recent_prices: Vec::new(),
        }
    }

    pub fn with_recent(price: f64, timestamp: DateTime<Utc>, recent_prices: Vec<f64>) -> Self {
        Self {
            price,
            timestamp,
            recent_prices,
        }
    }
}

impl MarketView for MarketSnapshot {
    fn price(&self) -> f64 {
        self.price
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn recent_prices(&self) -> &[f64] {
        &self.recent_prices
    }
}
