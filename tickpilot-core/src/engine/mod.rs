//! Decision engine — the adaptive momentum-reversal strategy.
//!
//! One `evaluate` call per tick runs the strict priority chain:
//! drawdown gate → throttle gate → history gate → exit rules → entry
//! scoring → hold. One `report_fill` call per executed decision keeps the
//! ledger and throttle in sync with the true portfolio. Reordering the
//! chain changes outcomes; the order here is the contract.

pub mod entry;
pub mod exit;
pub mod sizing;

use crate::config::{ConfigError, StrategyConfig};
use crate::domain::{Action, FillReport, MarketView, PortfolioView, Signal};
use crate::history::HistoryBuffer;
use crate::indicators::{self, Bands, Macd};
use crate::ledger::PositionLedger;
use crate::risk::{RiskGovernor, RiskVerdict};
use crate::state::StrategyState;
use tracing::debug;

/// A single-instrument signal engine.
///
/// One evaluation call and one fill-report call execute strictly
/// sequentially per instrument; multiple instruments get independent
/// instances with no shared mutable state.
pub trait Strategy {
    fn name(&self) -> &str;

    /// Evaluate one tick and emit exactly one decision.
    fn evaluate(&mut self, market: &dyn MarketView, portfolio: &dyn PortfolioView) -> Signal;

    /// Report an executed (or simulated) fill back to the engine.
    fn report_fill(&mut self, fill: &FillReport);

    /// Export a restartable snapshot of the engine state.
    fn export_state(&self) -> StrategyState;

    /// Restore a snapshot. Fails on a config fingerprint mismatch.
    fn import_state(&mut self, state: StrategyState) -> Result<(), ConfigError>;
}

/// Indicator values computed once per tick and shared by exit and entry
/// evaluation. Absent values are non-confirming everywhere.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IndicatorSet {
    pub rsi: Option<f64>,
    pub macd: Macd,
    pub bands: Option<Bands>,
    pub volatility: f64,
}

/// Multi-indicator momentum-reversal strategy with FIFO lot accounting,
/// drawdown protection, and trade throttling.
pub struct AdaptiveMomentum {
    config: StrategyConfig,
    history: HistoryBuffer,
    ledger: PositionLedger,
    governor: RiskGovernor,
}

impl AdaptiveMomentum {
    pub const NAME: &'static str = "adaptive_momentum";
    /// Alternate registry name kept for older host configurations.
    pub const ALIAS: &'static str = "momentum_reversal";

    /// Construct with a validated configuration. Invalid thresholds fail
    /// here, never silently corrected later.
    pub fn new(config: StrategyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let governor = RiskGovernor::new(config.max_drawdown_limit, config.min_trade_interval_min);
        Ok(Self {
            config,
            history: HistoryBuffer::new(),
            ledger: PositionLedger::new(),
            governor,
        })
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub(crate) fn ledger(&self) -> &PositionLedger {
        &self.ledger
    }

    fn evaluate_tick(
        &mut self,
        market: &dyn MarketView,
        portfolio: &dyn PortfolioView,
    ) -> Signal {
        let price = market.price();
        let now = market.timestamp();

        // Cold start: seed indicator warm-up from the driver's recent
        // window before the first tick lands.
        if self.history.is_empty() {
            for &seed in market.recent_prices() {
                self.history.push(seed);
            }
        }
        self.history.push(price);

        // 1. Drawdown gate.
        if let RiskVerdict::Blocked { drawdown_pct } = self.governor.observe(portfolio.value(price))
        {
            return Signal::hold(format!("Risk limits exceeded: drawdown {drawdown_pct:.1}%"));
        }

        // 2. Throttle gate.
        if !self.governor.can_trade(now) {
            return Signal::hold("Time throttling active");
        }

        // 3. History gate: the slowest indicator window must be full.
        let prices = self.history.prices();
        if prices.len() < self.config.min_history() {
            return Signal::hold("Insufficient price history");
        }

        let indicators = IndicatorSet {
            rsi: indicators::rsi(&prices, self.config.rsi_period),
            macd: indicators::macd(
                &prices,
                self.config.macd_fast,
                self.config.macd_slow,
                self.config.macd_signal,
                &self.history.ema_fast(),
                &self.history.ema_slow(),
            ),
            bands: indicators::bollinger(&prices, self.config.bb_period, self.config.bb_std_dev),
            volatility: indicators::volatility(&prices, self.config.volatility_period),
        };

        // Record the EMA pair for the next tick's MACD signal line. Both
        // are defined here because the history gate already passed.
        if let (Some(fast), Some(slow)) = (
            indicators::ema(&prices, self.config.macd_fast),
            indicators::ema(&prices, self.config.macd_slow),
        ) {
            self.history.record_ema(fast, slow);
        }

        // 4. Exit rules on an open position.
        if portfolio.quantity() > 0.0 && self.ledger.has_open_lots() {
            if let Some(signal) = self.evaluate_exits(price, portfolio, &indicators, &prices) {
                return signal;
            }
        }

        // 5. Entry scoring (holding a position does not preclude adding,
        // bounded by the target allocation).
        if let Some(signal) = self.evaluate_entry(price, portfolio, &indicators, &prices) {
            return signal;
        }

        Signal::hold("No clear signals")
    }
}

impl Strategy for AdaptiveMomentum {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn evaluate(&mut self, market: &dyn MarketView, portfolio: &dyn PortfolioView) -> Signal {
        let signal = self.evaluate_tick(market, portfolio);
        debug!(
            action = ?signal.action,
            size = signal.size,
            reason = %signal.reason,
            "tick evaluated"
        );
        signal
    }

    fn report_fill(&mut self, fill: &FillReport) {
        if fill.size <= 0.0 {
            return;
        }
        match fill.action {
            Action::Buy => {
                self.ledger.record_buy(fill.price, fill.size, fill.timestamp);
            }
            Action::Sell => {
                self.ledger.record_sell(fill.price, fill.size, fill.timestamp);
            }
            Action::Hold => return,
        }
        self.governor.record_trade(fill.timestamp);
    }

    fn export_state(&self) -> StrategyState {
        StrategyState {
            config_fingerprint: self.config.fingerprint(),
            lots: self.ledger.lots(),
            total_trades: self.ledger.total_trades(),
            winning_trades: self.ledger.winning_trades(),
            realized_pnl: self.ledger.realized_pnl(),
            peak_value: self.governor.peak_value(),
            last_trade: self.governor.last_trade(),
            price_history: self.history.prices(),
            ema_fast_history: self.history.ema_fast(),
            ema_slow_history: self.history.ema_slow(),
        }
    }

    fn import_state(&mut self, state: StrategyState) -> Result<(), ConfigError> {
        let current = self.config.fingerprint();
        if state.config_fingerprint != current {
            return Err(ConfigError::SnapshotMismatch {
                snapshot: state.config_fingerprint,
                current,
            });
        }

        self.history = HistoryBuffer::from_parts(
            state.price_history,
            state.ema_fast_history,
            state.ema_slow_history,
        );
        self.ledger = PositionLedger::from_parts(
            state.lots,
            state.total_trades,
            state.winning_trades,
            state.realized_pnl,
        );
        self.governor = RiskGovernor::from_parts(
            self.config.max_drawdown_limit,
            self.config.min_trade_interval_min,
            state.peak_value,
            state.last_trade,
        );
        Ok(())
    }
}
