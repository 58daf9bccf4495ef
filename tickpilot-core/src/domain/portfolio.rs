//! Portfolio view — cash, open quantity, and valuation.

/// What the engine needs to know about the portfolio on one tick.
///
/// The engine never mutates the portfolio; it only reads cash and quantity
/// to gate entries, size positions, and feed the drawdown governor. The
/// identity `value(price) == cash + quantity * price` must hold.
pub trait PortfolioView {
    fn cash(&self) -> f64;
    fn quantity(&self) -> f64;

    fn value(&self, price: f64) -> f64 {
        self.cash() + self.quantity() * price
    }
}

/// Plain-struct portfolio snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioSnapshot {
    pub cash: f64,
    pub quantity: f64,
}

impl PortfolioSnapshot {
    pub fn new(cash: f64, quantity: f64) -> Self {
        Self { cash, quantity }
    }
}

impl PortfolioView for PortfolioSnapshot {
    fn cash(&self) -> f64 {
        self.cash
    }

    fn quantity(&self) -> f64 {
        self.quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_cash_plus_position() {
        let portfolio = PortfolioSnapshot::new(1_000.0, 2.0);
        assert_eq!(portfolio.value(150.0), 1_300.0);
    }

    #[test]
    fn value_with_no_position_is_cash() {
        let portfolio = PortfolioSnapshot::new(10_000.0, 0.0);
        assert_eq!(portfolio.value(42.0), 10_000.0);
    }
}
