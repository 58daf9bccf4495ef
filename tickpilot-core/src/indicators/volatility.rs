//! Realized volatility — population standard deviation of simple returns.
//!
//! Lookback: period + 1 prices (period return intervals).
//! Insufficient history returns a fixed 2% default instead of None: the
//! value feeds position sizing, which needs a number on every tick, and the
//! default must be reproduced exactly for deterministic sizing.

use super::population_std_dev;

/// Volatility assumed when there is not enough history to measure it.
pub const DEFAULT_VOLATILITY: f64 = 0.02;

/// Volatility of the trailing `period` simple returns.
pub fn volatility(prices: &[f64], period: usize) -> f64 {
    if period < 2 || prices.len() < period + 1 {
        return DEFAULT_VOLATILITY;
    }

    let start = prices.len() - period;
    let returns: Vec<f64> = (start..prices.len())
        .map(|i| (prices[i] - prices[i - 1]) / prices[i - 1])
        .collect();

    population_std_dev(&returns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    #[test]
    fn insufficient_history_uses_default() {
        let prices: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        assert_eq!(volatility(&prices, 20), DEFAULT_VOLATILITY);
        assert_eq!(volatility(&[], 20), DEFAULT_VOLATILITY);
    }

    #[test]
    fn constant_returns_have_zero_volatility() {
        // +1% every tick → all returns identical → stddev 0
        let mut prices = vec![100.0];
        for _ in 0..25 {
            let last = *prices.last().unwrap();
            prices.push(last * 1.01);
        }
        assert_approx(volatility(&prices, 20), 0.0, 1e-12);
    }

    #[test]
    fn alternating_returns_hand_computed() {
        // Returns alternate +10% / -10%... use a 2-period window over 3 prices:
        // returns are [+0.10, -0.0909...], pstdev is half their spread.
        let prices = [100.0, 110.0, 100.0];
        let r1: f64 = 0.10;
        let r2 = (100.0 - 110.0) / 110.0;
        let expected = ((r1 - r2) / 2.0).abs();
        assert_approx(volatility(&prices, 2), expected, 1e-12);
    }

    #[test]
    fn choppier_series_is_more_volatile() {
        let calm: Vec<f64> = (0..30).map(|i| 100.0 + i as f64 * 0.1).collect();
        let choppy: Vec<f64> = (0..30)
            .map(|i| if i % 2 == 0 { 100.0 } else { 110.0 })
            .collect();
        assert!(volatility(&choppy, 20) > volatility(&calm, 20));
    }
}
