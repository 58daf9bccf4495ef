//! Rolling history buffer — the engine's only memory across ticks.
//!
//! Bounded, insertion-ordered price history plus the fast/slow EMA pair
//! history the MACD signal line is reconstructed from. Eviction is FIFO
//! (oldest first) and the caps never change: indicator correctness depends
//! on window alignment, so state import re-imposes the same caps.

use std::collections::VecDeque;

/// Maximum retained prices.
pub const PRICE_CAP: usize = 100;
/// Maximum retained fast/slow EMA pairs.
pub const EMA_CAP: usize = 50;

/// Bounded price and EMA histories.
///
/// The EMA histories are appended only as a pair (`record_ema`), so they
/// grow and evict in lockstep and the index-aligned MACD reconstruction
/// cannot drift.
#[derive(Debug, Clone, Default)]
pub struct HistoryBuffer {
    prices: VecDeque<f64>,
    ema_fast: VecDeque<f64>,
    ema_slow: VecDeque<f64>,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self {
            prices: VecDeque::with_capacity(PRICE_CAP),
            ema_fast: VecDeque::with_capacity(EMA_CAP),
            ema_slow: VecDeque::with_capacity(EMA_CAP),
        }
    }

    /// Append a price, evicting the oldest when at capacity.
    pub fn push(&mut self, price: f64) {
        if self.prices.len() == PRICE_CAP {
            self.prices.pop_front();
        }
        self.prices.push_back(price);
    }

    /// Append the latest fast/slow EMA pair, evicting the oldest pair on
    /// overflow.
    pub fn record_ema(&mut self, fast: f64, slow: f64) {
        if self.ema_fast.len() == EMA_CAP {
            self.ema_fast.pop_front();
        }
        if self.ema_slow.len() == EMA_CAP {
            self.ema_slow.pop_front();
        }
        self.ema_fast.push_back(fast);
        self.ema_slow.push_back(slow);
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Contiguous snapshot of the current prices, oldest first.
    pub fn prices(&self) -> Vec<f64> {
        self.prices.iter().copied().collect()
    }

    /// Contiguous snapshot of the fast EMA history, oldest first.
    pub fn ema_fast(&self) -> Vec<f64> {
        self.ema_fast.iter().copied().collect()
    }

    /// Contiguous snapshot of the slow EMA history, oldest first.
    pub fn ema_slow(&self) -> Vec<f64> {
        self.ema_slow.iter().copied().collect()
    }

    /// Rebuild a buffer from exported histories, keeping only the most
    /// recent entries when a snapshot exceeds the caps.
    pub fn from_parts(prices: Vec<f64>, ema_fast: Vec<f64>, ema_slow: Vec<f64>) -> Self {
        fn capped(values: Vec<f64>, cap: usize) -> VecDeque<f64> {
            let skip = values.len().saturating_sub(cap);
            values.into_iter().skip(skip).collect()
        }
        Self {
            prices: capped(prices, PRICE_CAP),
            ema_fast: capped(ema_fast, EMA_CAP),
            ema_slow: capped(ema_slow, EMA_CAP),
        }
    }
}
