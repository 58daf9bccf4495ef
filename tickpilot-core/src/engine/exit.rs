//! Exit rules — evaluated in strict priority order on an open position.
//!
//! 1. Stop-loss: full exit, highest priority.
//! 2. Take-profit: 80% exit, leaving a 20% runner.
//! 3. Strong weakness (overbought + bearish MACD): 60% exit.
//! 4. Extreme extension (overbought + 3% above upper band): 60% exit.
//! 5. Defensive exit (≥ +20% unrealized + any weakness): 40% exit.
//!
//! No rule firing falls through to entry evaluation: holding a position
//! does not preclude adding to it.

use super::{AdaptiveMomentum, IndicatorSet};
use crate::domain::{PortfolioView, Signal};

/// Histogram ceiling for the bearish MACD confirmation.
const BEARISH_HISTOGRAM_CEILING: f64 = -1.0;
/// Price this far above the upper Bollinger Band counts as extreme.
const BAND_EXTENSION: f64 = 1.03;
/// Unrealized gain (percent) that arms the defensive exit.
const DEFENSIVE_PNL_PCT: f64 = 20.0;
/// Pullback from the 20-tick high (percent) that counts as a reversal.
const REVERSAL_PULLBACK_PCT: f64 = 5.0;
const REVERSAL_LOOKBACK: usize = 20;

const TAKE_PROFIT_FRACTION: f64 = 0.8;
const WEAKNESS_FRACTION: f64 = 0.6;
const DEFENSIVE_FRACTION: f64 = 0.4;

impl AdaptiveMomentum {
    /// Evaluate the exit chain. `None` falls through to entry scoring.
    pub(crate) fn evaluate_exits(
        &self,
        price: f64,
        portfolio: &dyn PortfolioView,
        indicators: &IndicatorSet,
        prices: &[f64],
    ) -> Option<Signal> {
        let avg_entry = self.ledger().average_entry_price(price);
        let pnl_pct = (price - avg_entry) / avg_entry * 100.0;
        let quantity = portfolio.quantity();

        // 1. Stop-loss: full exit before any other rule is considered.
        let loss_pct = (avg_entry - price) / avg_entry * 100.0;
        if loss_pct >= self.config().stop_loss_pct {
            return Some(Signal::sell(
                self.clamp_sell(quantity),
                "Stop loss triggered",
            ));
        }

        // 2. Take-profit: sell most, keep 20% riding.
        if pnl_pct >= self.config().take_profit_pct {
            return Some(Signal::sell(
                self.clamp_sell(quantity * TAKE_PROFIT_FRACTION),
                format!("Take profit (80%): +{pnl_pct:.1}%"),
            ));
        }

        let overbought = indicators
            .rsi
            .is_some_and(|rsi| rsi >= self.config().rsi_overbought);
        let bearish_macd = indicators.macd.is_bearish(BEARISH_HISTOGRAM_CEILING);
        let band_breach = indicators
            .bands
            .is_some_and(|bands| price >= bands.upper * BAND_EXTENSION);

        // 3. Strong combined weakness.
        if overbought && bearish_macd {
            let rsi = indicators.rsi.unwrap_or_default();
            return Some(Signal::sell(
                self.clamp_sell(quantity * WEAKNESS_FRACTION),
                format!("Strong weakness (60%): RSI {rsi:.1} + MACD bearish"),
            ));
        }

        // 4. Extreme extension above the upper band.
        if overbought && band_breach {
            let rsi = indicators.rsi.unwrap_or_default();
            return Some(Signal::sell(
                self.clamp_sell(quantity * WEAKNESS_FRACTION),
                format!("Extreme extension (60%): RSI {rsi:.1} + BB +3%"),
            ));
        }

        // 5. Defensive exit: solid profit plus any weakness signal.
        let reversal = self.pullback_reversal(price, pnl_pct, prices);
        if pnl_pct >= DEFENSIVE_PNL_PCT && (overbought || bearish_macd || reversal) {
            return Some(Signal::sell(
                self.clamp_sell(quantity * DEFENSIVE_FRACTION),
                format!("Defensive exit (40%): +{pnl_pct:.1}% + weakness"),
            ));
        }

        None
    }

    /// A ≥5% drop from the 20-tick high while the position is still
    /// profitable.
    fn pullback_reversal(&self, price: f64, pnl_pct: f64, prices: &[f64]) -> bool {
        if prices.len() < REVERSAL_LOOKBACK {
            return false;
        }
        let recent_high = prices[prices.len() - REVERSAL_LOOKBACK..]
            .iter()
            .copied()
            .fold(f64::MIN, f64::max);
        if recent_high <= 0.0 {
            return false;
        }
        let drop_pct = (recent_high - price) / recent_high * 100.0;
        drop_pct >= REVERSAL_PULLBACK_PCT && pnl_pct > 0.0
    }

    /// Sells never request more than the ledger's open quantity.
    fn clamp_sell(&self, size: f64) -> f64 {
        size.min(self.ledger().open_quantity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrategyConfig;
    use crate::domain::{Action, FillReport, MarketSnapshot, PortfolioSnapshot, Signal};
    use crate::engine::Strategy;
    use crate::indicators::{Bands, Macd};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
    }

    /// Engine holding one lot, without any warm-up ticks. Direct rule
    /// tests hand `evaluate_exits` synthetic indicator values.
    fn engine_holding(entry: f64, size: f64, config: StrategyConfig) -> AdaptiveMomentum {
        let mut strategy = AdaptiveMomentum::new(config).unwrap();
        strategy.report_fill(&FillReport {
            action: Action::Buy,
            price: entry,
            size,
            timestamp: base_time(),
        });
        strategy
    }

    fn indicator_set(rsi: Option<f64>, macd: Macd, bands: Option<Bands>) -> IndicatorSet {
        IndicatorSet {
            rsi,
            macd,
            bands,
            volatility: 0.02,
        }
    }

    fn bearish_macd() -> Macd {
        Macd {
            line: Some(-0.5),
            signal: Some(1.5),
            histogram: Some(-2.0),
        }
    }

    /// Warm the engine up with flat-ish history, then open a lot at `entry`.
    fn engine_with_lot(entry: f64, size: f64) -> AdaptiveMomentum {
        let config = StrategyConfig {
            min_trade_interval_min: 0,
            ..Default::default()
        };
        let mut strategy = AdaptiveMomentum::new(config).unwrap();
        let portfolio = PortfolioSnapshot::new(10_000.0, 0.0);
        for i in 0..30 {
            let market = MarketSnapshot::new(entry, base_time() + Duration::minutes(i));
            strategy.evaluate(&market, &portfolio);
        }
        strategy.report_fill(&FillReport {
            action: Action::Buy,
            price: entry,
            size,
            timestamp: base_time() + Duration::minutes(30),
        });
        strategy
    }

    fn evaluate_at(strategy: &mut AdaptiveMomentum, price: f64, quantity: f64) -> Signal {
        let market = MarketSnapshot::new(price, base_time() + Duration::minutes(90));
        let cash = 10_000.0 - quantity * 100.0;
        strategy.evaluate(&market, &PortfolioSnapshot::new(cash, quantity))
    }

    #[test]
    fn stop_loss_sells_everything_first() {
        let mut strategy = engine_with_lot(100.0, 5.0);
        // 9% below entry: past the 8% stop.
        let signal = evaluate_at(&mut strategy, 91.0, 5.0);
        assert_eq!(signal.action, Action::Sell);
        assert_eq!(signal.size, 5.0);
        assert_eq!(signal.reason, "Stop loss triggered");
    }

    #[test]
    fn take_profit_leaves_a_runner() {
        let mut strategy = engine_with_lot(100.0, 5.0);
        let signal = evaluate_at(&mut strategy, 116.0, 5.0);
        assert_eq!(signal.action, Action::Sell);
        assert!((signal.size - 4.0).abs() < 1e-10);
        assert!(signal.reason.starts_with("Take profit (80%)"));
    }

    #[test]
    fn stop_loss_outranks_take_profit_branching() {
        // Price below entry can never satisfy take-profit; this documents
        // the ordering by checking the stop fires even when other exit
        // inputs (RSI, MACD) are absent or neutral.
        let mut strategy = engine_with_lot(200.0, 1.0);
        let signal = evaluate_at(&mut strategy, 180.0, 1.0);
        assert_eq!(signal.reason, "Stop loss triggered");
    }

    #[test]
    fn sell_size_clamped_to_ledger_open_quantity() {
        let mut strategy = engine_with_lot(100.0, 2.0);
        // Portfolio claims more than the ledger knows about.
        let signal = evaluate_at(&mut strategy, 91.0, 7.0);
        assert_eq!(signal.action, Action::Sell);
        assert_eq!(signal.size, 2.0);
    }

    #[test]
    fn strong_weakness_sells_sixty_percent() {
        // +5% sits between the stop and the take-profit, so only the
        // overbought-plus-bearish-MACD rule can fire.
        let strategy = engine_holding(100.0, 10.0, StrategyConfig::default());
        let portfolio = PortfolioSnapshot::new(1_000.0, 10.0);
        let indicators = indicator_set(Some(80.0), bearish_macd(), None);

        let signal = strategy
            .evaluate_exits(105.0, &portfolio, &indicators, &[100.0; 5])
            .unwrap();
        assert_eq!(signal.action, Action::Sell);
        assert!((signal.size - 6.0).abs() < 1e-10);
        assert!(signal.reason.starts_with("Strong weakness (60%): RSI 80.0"));
    }

    #[test]
    fn weakness_needs_the_histogram_under_the_ceiling() {
        // Line below signal but histogram above -1.0: not a confirmation.
        let strategy = engine_holding(100.0, 10.0, StrategyConfig::default());
        let portfolio = PortfolioSnapshot::new(1_000.0, 10.0);
        let soft = Macd {
            line: Some(0.5),
            signal: Some(1.0),
            histogram: Some(-0.5),
        };
        let indicators = indicator_set(Some(80.0), soft, None);

        let signal = strategy.evaluate_exits(105.0, &portfolio, &indicators, &[100.0; 5]);
        assert!(signal.is_none());
    }

    #[test]
    fn extreme_extension_sells_sixty_percent() {
        // Overbought with price 4% above the upper band but a neutral
        // MACD: rule 4, not rule 3.
        let strategy = engine_holding(100.0, 10.0, StrategyConfig::default());
        let portfolio = PortfolioSnapshot::new(1_000.0, 10.0);
        let bands = Bands {
            upper: 100.0,
            middle: 95.0,
            lower: 90.0,
        };
        let indicators = indicator_set(Some(80.0), Macd::default(), Some(bands));

        let signal = strategy
            .evaluate_exits(104.0, &portfolio, &indicators, &[100.0; 5])
            .unwrap();
        assert_eq!(signal.action, Action::Sell);
        assert!((signal.size - 6.0).abs() < 1e-10);
        assert!(signal.reason.starts_with("Extreme extension (60%)"));
    }

    #[test]
    fn extension_needs_three_percent_above_the_band() {
        let strategy = engine_holding(100.0, 10.0, StrategyConfig::default());
        let portfolio = PortfolioSnapshot::new(1_000.0, 10.0);
        let bands = Bands {
            upper: 102.0,
            middle: 95.0,
            lower: 90.0,
        };
        // 104 is above the band but under 102 × 1.03.
        let indicators = indicator_set(Some(80.0), Macd::default(), Some(bands));
        let signal = strategy.evaluate_exits(104.0, &portfolio, &indicators, &[100.0; 5]);
        assert!(signal.is_none());
    }

    #[test]
    fn defensive_exit_sells_forty_percent_on_overbought_profit() {
        // Take-profit raised out of the way so a +25% position reaches
        // rule 5; a lone overbought reading is the weakness.
        let config = StrategyConfig {
            take_profit_pct: 30.0,
            ..Default::default()
        };
        let strategy = engine_holding(100.0, 10.0, config);
        let portfolio = PortfolioSnapshot::new(1_000.0, 10.0);
        let indicators = indicator_set(Some(80.0), Macd::default(), None);

        let signal = strategy
            .evaluate_exits(125.0, &portfolio, &indicators, &[100.0; 5])
            .unwrap();
        assert_eq!(signal.action, Action::Sell);
        assert!((signal.size - 4.0).abs() < 1e-10);
        assert!(signal.reason.starts_with("Defensive exit (40%): +25.0%"));
    }

    #[test]
    fn defensive_exit_arms_on_a_pullback_reversal() {
        // No indicator weakness at all: a ≥5% drop from the 20-tick high
        // is enough once the position is up 20%.
        let config = StrategyConfig {
            take_profit_pct: 30.0,
            ..Default::default()
        };
        let strategy = engine_holding(100.0, 10.0, config);
        let portfolio = PortfolioSnapshot::new(1_000.0, 10.0);
        let indicators = indicator_set(None, Macd::default(), None);

        let mut prices = vec![120.0; 15];
        prices.extend_from_slice(&[135.0, 134.0, 130.0, 127.0, 125.0]);
        let signal = strategy
            .evaluate_exits(125.0, &portfolio, &indicators, &prices)
            .unwrap();
        assert!(signal.reason.starts_with("Defensive exit (40%)"));

        // Same profit, no pullback: nothing fires.
        let flat = vec![125.0; 20];
        let signal = strategy.evaluate_exits(125.0, &portfolio, &indicators, &flat);
        assert!(signal.is_none());
    }

    #[test]
    fn weakness_outranks_extension_and_defensive() {
        // All of rules 3-5 are satisfied at once; rule 3 wins.
        let config = StrategyConfig {
            take_profit_pct: 30.0,
            ..Default::default()
        };
        let strategy = engine_holding(100.0, 10.0, config);
        let portfolio = PortfolioSnapshot::new(1_000.0, 10.0);
        let bands = Bands {
            upper: 110.0,
            middle: 100.0,
            lower: 90.0,
        };
        let indicators = indicator_set(Some(80.0), bearish_macd(), Some(bands));

        let signal = strategy
            .evaluate_exits(125.0, &portfolio, &indicators, &[100.0; 5])
            .unwrap();
        assert!(signal.reason.starts_with("Strong weakness (60%)"));

        // Drop the MACD confirmation: rule 4 takes over.
        let indicators = indicator_set(Some(80.0), Macd::default(), Some(bands));
        let signal = strategy
            .evaluate_exits(125.0, &portfolio, &indicators, &[100.0; 5])
            .unwrap();
        assert!(signal.reason.starts_with("Extreme extension (60%)"));
    }

    #[test]
    fn no_exit_without_open_lots() {
        let config = StrategyConfig::default();
        let mut strategy = AdaptiveMomentum::new(config).unwrap();
        let portfolio = PortfolioSnapshot::new(10_000.0, 0.0);
        for i in 0..30 {
            let market = MarketSnapshot::new(100.0, base_time() + Duration::minutes(i));
            let signal = strategy.evaluate(&market, &portfolio);
            assert_ne!(signal.reason, "Stop loss triggered");
        }
    }
}
