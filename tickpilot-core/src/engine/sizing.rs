//! Position sizing — volatility-damped fraction of portfolio value.
//!
//! size = min(value × max_position × volatility_factor, cash × 0.95) / price
//! with volatility_factor = max(0.5, 1 − volatility × 10). High-volatility
//! regimes shrink the commitment (floored at half), and a 5% cash buffer is
//! always reserved. Zero or negative results suppress the buy upstream.

use super::AdaptiveMomentum;
use crate::domain::PortfolioView;

/// Fraction of cash that may be spent on one entry.
const CASH_BUFFER: f64 = 0.95;
/// Floor on the volatility damping factor.
const MIN_VOLATILITY_FACTOR: f64 = 0.5;
/// Multiplier scaling volatility into the damping factor.
const VOLATILITY_IMPACT: f64 = 10.0;

impl AdaptiveMomentum {
    /// Quantity of the asset to buy, given current price and measured
    /// volatility. Returns the quantity, not notional currency.
    pub(crate) fn position_size(
        &self,
        price: f64,
        portfolio: &dyn PortfolioView,
        volatility: f64,
    ) -> f64 {
        if price <= 0.0 {
            return 0.0;
        }

        let base_notional = portfolio.value(price) * self.config().max_position_size;
        let volatility_factor = (1.0 - volatility * VOLATILITY_IMPACT).max(MIN_VOLATILITY_FACTOR);
        let damped = base_notional * volatility_factor;
        let cash_cap = portfolio.cash() * CASH_BUFFER;

        damped.min(cash_cap) / price
    }
}
