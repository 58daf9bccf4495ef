//! Relative Strength Index (RSI).
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss), where avg_gain is the mean
//! of the positive deltas among the trailing `period` deltas and avg_loss
//! the mean magnitude of the negative ones (each averaged over its own
//! subset, not over `period`).
//! Lookback: period + 1 prices.
//! Edge cases: avg_loss == 0 → RSI = 100 (covers the flat-price window);
//! fewer than period + 1 prices → None.

/// Compute RSI over the trailing `period` deltas of `prices`.
pub fn rsi(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period + 1 {
        return None;
    }

    let start = prices.len() - period;
    let mut gain_sum = 0.0;
    let mut gain_count = 0usize;
    let mut loss_sum = 0.0;
    let mut loss_count = 0usize;

    for i in start..prices.len() {
        let delta = prices[i] - prices[i - 1];
        if delta > 0.0 {
            gain_sum += delta;
            gain_count += 1;
        } else if delta < 0.0 {
            loss_sum -= delta;
            loss_count += 1;
        }
    }

    let avg_gain = if gain_count > 0 {
        gain_sum / gain_count as f64
    } else {
        0.0
    };
    let avg_loss = if loss_count > 0 {
        loss_sum / loss_count as f64
    } else {
        0.0
    };

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    #[test]
    fn insufficient_history_is_none() {
        let prices: Vec<f64> = (0..14).map(|i| 100.0 + i as f64).collect();
        assert!(rsi(&prices, 14).is_none());
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        assert!(rsi(&prices, 14).is_some());
    }

    #[test]
    fn all_gains_is_100() {
        let prices = [100.0, 101.0, 102.0, 103.0, 104.0];
        assert_approx(rsi(&prices, 3).unwrap(), 100.0, 1e-12);
    }

    #[test]
    fn flat_prices_are_100_not_an_error() {
        // 14 identical prices: no gains, no losses → avg_loss == 0 → 100.
        let prices = [50.0; 15];
        assert_approx(rsi(&prices, 14).unwrap(), 100.0, 1e-12);
    }

    #[test]
    fn all_losses_is_zero() {
        let prices = [104.0, 103.0, 102.0, 101.0, 100.0];
        assert_approx(rsi(&prices, 3).unwrap(), 0.0, 1e-12);
    }

    #[test]
    fn mixed_deltas_hand_computed() {
        // Deltas over period 4: +0.34, -0.25, -0.48, +0.72
        // avg_gain = (0.34 + 0.72) / 2 = 0.53
        // avg_loss = (0.25 + 0.48) / 2 = 0.365
        // RSI = 100 - 100 / (1 + 0.53/0.365) = 59.2178...
        let prices = [44.0, 44.34, 44.09, 43.61, 44.33];
        let expected = 100.0 - 100.0 / (1.0 + (0.53 / 0.365));
        assert_approx(rsi(&prices, 4).unwrap(), expected, 1e-10);
    }

    #[test]
    fn only_trailing_window_counts() {
        // A huge early spike outside the trailing window must not matter.
        let prices = [10.0, 500.0, 100.0, 101.0, 102.0, 103.0];
        assert_approx(rsi(&prices, 3).unwrap(), 100.0, 1e-12);
    }

    #[test]
    fn bounded_between_0_and_100() {
        let prices = [100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0];
        for period in 2..=7 {
            if let Some(value) = rsi(&prices, period) {
                assert!((0.0..=100.0).contains(&value), "period {period}: {value}");
            }
        }
    }
}
