//! Moving Average Convergence Divergence (MACD).
//!
//! Line: fast EMA - slow EMA over the price window.
//! Signal: EMA (over `signal_period`) of the historical MACD-line sequence,
//! reconstructed index-aligned from the stored fast/slow EMA histories.
//! Histogram: line - signal, only when both exist.
//!
//! Line and signal can be absent independently: a present line with an
//! absent signal means "insufficient confirmation", not an error, and the
//! decision engine treats it as non-confirming.

use super::ema::ema;

/// MACD components. Each part may be undefined independently.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Macd {
    pub line: Option<f64>,
    pub signal: Option<f64>,
    pub histogram: Option<f64>,
}

impl Macd {
    /// Bearish confirmation: line below signal with a histogram under the
    /// given ceiling. Absent components never confirm.
    pub fn is_bearish(&self, histogram_ceiling: f64) -> bool {
        match (self.line, self.signal, self.histogram) {
            (Some(line), Some(signal), Some(histogram)) => {
                line < signal && histogram < histogram_ceiling
            }
            _ => false,
        }
    }

    /// Bullish crossover with positive momentum. Absent components never
    /// confirm.
    pub fn is_bullish(&self) -> bool {
        match (self.line, self.signal, self.histogram) {
            (Some(line), Some(signal), Some(histogram)) => line > signal && histogram > 0.0,
            _ => false,
        }
    }
}

/// Compute MACD from the price window plus the recorded EMA pair histories.
pub fn macd(
    prices: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
    ema_fast_history: &[f64],
    ema_slow_history: &[f64],
) -> Macd {
    let fast = ema(prices, fast_period);
    let slow = ema(prices, slow_period);
    let line = match (fast, slow) {
        (Some(f), Some(s)) => Some(f - s),
        _ => return Macd::default(),
    };

    // Signal line needs enough recorded history to smooth over.
    let signal = if ema_fast_history.len() >= signal_period {
        let macd_history: Vec<f64> = ema_fast_history
            .iter()
            .zip(ema_slow_history)
            .map(|(f, s)| f - s)
            .collect();
        ema(&macd_history, signal_period)
    } else {
        None
    };

    let histogram = match (line, signal) {
        (Some(l), Some(s)) => Some(l - s),
        _ => None,
    };

    Macd {
        line,
        signal,
        histogram,
    }
}
