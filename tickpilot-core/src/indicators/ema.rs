//! Exponential Moving Average (EMA).
//!
//! Seeded with the first element of the supplied window, then smoothed
//! across the whole slice with multiplier k = 2 / (period + 1):
//! ema = price * k + ema * (1 - k).
//! The period gates the minimum window length and sets the multiplier; the
//! smoothing always runs over every supplied price.

/// Compute the EMA of `prices`, or `None` below `period` samples.
pub fn ema(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period {
        return None;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut value = prices[0];
    for &price in &prices[1..] {
        value = price * k + value * (1.0 - k);
    }
    Some(value)
}
