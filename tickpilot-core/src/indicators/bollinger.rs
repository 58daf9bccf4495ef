//! Bollinger Bands.
//!
//! Middle: simple moving average over the trailing `period` prices.
//! Upper/lower: middle ± multiplier × population standard deviation.
//! Lookback: period. Fewer samples → None.

use super::population_std_dev;

/// The three Bollinger Band values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Compute Bollinger Bands over the trailing `period` prices.
pub fn bollinger(prices: &[f64], period: usize, std_dev_multiplier: f64) -> Option<Bands> {
    if period == 0 || prices.len() < period {
        return None;
    }

    let window = &prices[prices.len() - period..];
    let middle = window.iter().sum::<f64>() / period as f64;
    let band = std_dev_multiplier * population_std_dev(window);

    Some(Bands {
        upper: middle + band,
        middle,
        lower: middle - band,
    })
}
