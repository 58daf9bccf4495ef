//! Entry scoring — weighted accumulation of independent bullish signals.
//!
//! Entries are only evaluated while the invested fraction sits below the
//! target allocation and cash clears a minimal floor. A severe medium-term
//! downtrend is a hard veto that skips every other signal. Otherwise each
//! condition adds its weight; two points or more produce a sized buy whose
//! reason names the top two contributors, in accumulation order.

use super::{AdaptiveMomentum, IndicatorSet};
use crate::domain::{PortfolioView, Signal};

/// Medium-term trend at or below this fraction vetoes all entries.
const SEVERE_DOWNTREND: f64 = -0.10;
/// Long-term trend above this fraction scores as a strong uptrend.
const STRONG_UPTREND: f64 = 0.05;
/// Medium-term trend above this fraction scores as a moderate uptrend.
const MODERATE_UPTREND: f64 = 0.02;
/// Width of the RSI recovery band above the oversold threshold.
const RSI_RECOVERY_BAND: f64 = 5.0;
/// Price within this multiple of the lower Bollinger Band scores.
const BAND_PROXIMITY: f64 = 1.01;

const TREND_LOOKBACK: usize = 20;
const LONG_TREND_LOOKBACK: usize = 50;
const BOUNCE_LOOKBACK: usize = 10;

/// Minimum accumulated weight required to emit a buy.
const MIN_SIGNALS: u32 = 2;

impl AdaptiveMomentum {
    /// Evaluate entry conditions. `None` falls through to the terminal
    /// "no clear signals" hold; `Some(hold)` is the downtrend veto.
    pub(crate) fn evaluate_entry(
        &self,
        price: f64,
        portfolio: &dyn PortfolioView,
        indicators: &IndicatorSet,
        prices: &[f64],
    ) -> Option<Signal> {
        let position_value = portfolio.quantity() * price;
        let total_value = portfolio.cash() + position_value;
        let invested_fraction = if total_value > 0.0 {
            position_value / total_value
        } else {
            0.0
        };

        if portfolio.cash() <= self.config().min_cash_floor
            || invested_fraction >= self.config().target_allocation
        {
            return None;
        }

        let mut score = 0u32;
        let mut reasons: Vec<String> = Vec::new();

        if prices.len() >= TREND_LOOKBACK {
            let n = prices.len();
            let medium_trend = (price - prices[n - TREND_LOOKBACK]) / prices[n - TREND_LOOKBACK];
            let long_trend = if n >= LONG_TREND_LOOKBACK {
                (price - prices[n - LONG_TREND_LOOKBACK]) / prices[n - LONG_TREND_LOOKBACK]
            } else {
                medium_trend
            };

            // Hard veto: never buy into a severe downtrend.
            if medium_trend <= SEVERE_DOWNTREND {
                return Some(Signal::hold("Severe downtrend"));
            }

            if long_trend > STRONG_UPTREND {
                score += 2;
                reasons.push("Strong long-term uptrend".into());
            } else if medium_trend > MODERATE_UPTREND {
                score += 1;
                reasons.push("Medium uptrend".into());
            }
        }

        // RSI recovering out of the oversold band times entries better
        // than raw oversold readings.
        if let Some(rsi) = indicators.rsi {
            let oversold = self.config().rsi_oversold;
            if rsi > oversold && rsi <= oversold + RSI_RECOVERY_BAND {
                score += 2;
                reasons.push(format!("RSI recovering: {rsi:.1}"));
            }
        }

        if indicators.macd.is_bullish() {
            score += 1;
            reasons.push("MACD bullish".into());
        }

        if let Some(bands) = indicators.bands {
            if price <= bands.lower * BAND_PROXIMITY {
                score += 2;
                reasons.push("Price at lower Bollinger Band".into());
            }
        }

        if prices.len() >= BOUNCE_LOOKBACK {
            let recent_low = prices[prices.len() - BOUNCE_LOOKBACK..]
                .iter()
                .copied()
                .fold(f64::MAX, f64::min);
            if recent_low > 0.0 {
                let bounce_pct = (price - recent_low) / recent_low * 100.0;
                if (2.0..=5.0).contains(&bounce_pct) {
                    score += 2;
                    reasons.push(format!("Momentum breakout: +{bounce_pct:.1}%"));
                } else if (-1.0..0.0).contains(&bounce_pct) {
                    score += 1;
                    reasons.push("Dip buy opportunity".into());
                }
            }
        }

        if score >= MIN_SIGNALS {
            let size = self.position_size(price, portfolio, indicators.volatility);
            if size > 0.0 {
                let top: Vec<&str> = reasons.iter().take(2).map(String::as_str).collect();
                return Some(Signal::buy(size, format!("Buy signals: {}", top.join(", "))));
            }
        }

        None
    }
}
