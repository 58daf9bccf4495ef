//! Pure indicator functions over an ordered price window.
//!
//! Every function is deterministic given its input slice, never mutates the
//! history buffer, and reports insufficient data as `None` (or a documented
//! default) rather than an error. The decision engine treats `None` as
//! non-confirming: it never contributes a positive signal and never
//! triggers an exit condition that depends on it.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod volatility;

pub use bollinger::{bollinger, Bands};
pub use ema::ema;
pub use macd::{macd, Macd};
pub use rsi::rsi;
pub use volatility::{volatility, DEFAULT_VOLATILITY};

/// Population standard deviation (divides by n, not n-1).
pub(crate) fn population_std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}
