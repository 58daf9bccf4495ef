//! Strategy configuration — flat threshold set, validated at construction.
//!
//! All fields are optional on the wire (TOML/JSON) and fall back to the
//! documented defaults. The engine never mutates or "fixes" a config after
//! construction: invalid thresholds fail fast with a `ConfigError`.

use serde::{Deserialize, Serialize};

/// Flat configuration surface for the adaptive momentum-reversal strategy.
///
/// Percentages (`stop_loss_pct`, `take_profit_pct`, `max_drawdown_limit`)
/// are expressed in percent (8.0 = 8%); fractions (`max_position_size`,
/// `target_allocation`) are expressed in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrategyConfig {
    /// RSI lookback in ticks.
    pub rsi_period: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,

    /// MACD fast/slow EMA periods and signal-line EMA period.
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,

    /// Bollinger Band SMA period and standard-deviation multiplier.
    pub bb_period: usize,
    pub bb_std_dev: f64,

    /// Realized-volatility lookback (intervals).
    pub volatility_period: usize,

    /// Maximum fraction of portfolio value committed per entry.
    pub max_position_size: f64,
    /// Loss from average entry (percent) that forces a full exit.
    pub stop_loss_pct: f64,
    /// Gain from average entry (percent) that triggers an 80% exit.
    pub take_profit_pct: f64,
    /// Drawdown from peak portfolio value (percent) that vetoes new entries.
    pub max_drawdown_limit: f64,
    /// Minimum minutes between any two trade actions.
    pub min_trade_interval_min: i64,

    /// Fraction of portfolio value the engine keeps invested in uptrends.
    pub target_allocation: f64,
    /// Minimum cash balance (currency units) required to evaluate entries.
    pub min_cash_floor: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            rsi_oversold: 25.0,
            rsi_overbought: 75.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bb_period: 20,
            bb_std_dev: 2.0,
            volatility_period: 20,
            max_position_size: 0.30,
            stop_loss_pct: 8.0,
            take_profit_pct: 15.0,
            max_drawdown_limit: 45.0,
            min_trade_interval_min: 30,
            target_allocation: 0.85,
            min_cash_floor: 100.0,
        }
    }
}

impl StrategyConfig {
    /// Validate thresholds. Called by the engine constructor; also usable by
    /// hosts that want to reject a config before wiring anything up.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("bb_period", self.bb_period),
            ("volatility_period", self.volatility_period),
        ] {
            if value < 1 {
                return Err(ConfigError::ZeroPeriod { name });
            }
        }

        if self.macd_fast >= self.macd_slow {
            return Err(ConfigError::MacdPeriodOrder {
                fast: self.macd_fast,
                slow: self.macd_slow,
            });
        }
        if self.rsi_oversold >= self.rsi_overbought {
            return Err(ConfigError::InvertedRsiBands {
                oversold: self.rsi_oversold,
                overbought: self.rsi_overbought,
            });
        }

        for (name, value) in [
            ("rsi_oversold", self.rsi_oversold),
            ("rsi_overbought", self.rsi_overbought),
            ("bb_std_dev", self.bb_std_dev),
            ("stop_loss_pct", self.stop_loss_pct),
            ("take_profit_pct", self.take_profit_pct),
            ("max_drawdown_limit", self.max_drawdown_limit),
        ] {
            if value <= 0.0 || !value.is_finite() {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        for (name, value) in [
            ("max_position_size", self.max_position_size),
            ("target_allocation", self.target_allocation),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::FractionOutOfRange { name, value });
            }
        }

        if self.min_trade_interval_min < 0 {
            return Err(ConfigError::NegativeInterval {
                value: self.min_trade_interval_min,
            });
        }
        if self.min_cash_floor < 0.0 || !self.min_cash_floor.is_finite() {
            return Err(ConfigError::NonPositive {
                name: "min_cash_floor",
                value: self.min_cash_floor,
            });
        }

        Ok(())
    }

    /// Deterministic fingerprint of this configuration.
    ///
    /// Stored inside state snapshots so an import against a different
    /// configuration is detected instead of silently producing divergent
    /// decisions. Field order in the struct is fixed, so serde_json output
    /// is canonical.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).expect("StrategyConfig must serialize");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }

    /// Minimum price history required before any indicator-driven decision.
    pub fn min_history(&self) -> usize {
        self.rsi_period.max(self.bb_period).max(self.macd_slow)
    }
}

/// Errors raised by `StrategyConfig::validate` and state import.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be >= 1")]
    ZeroPeriod { name: &'static str },

    #[error("{name} must be positive and finite (got {value})")]
    NonPositive { name: &'static str, value: f64 },

    #[error("macd_fast ({fast}) must be below macd_slow ({slow})")]
    MacdPeriodOrder { fast: usize, slow: usize },

    #[error("rsi_oversold ({oversold}) must be below rsi_overbought ({overbought})")]
    InvertedRsiBands { oversold: f64, overbought: f64 },

    #[error("{name} must be within (0, 1] (got {value})")]
    FractionOutOfRange { name: &'static str, value: f64 },

    #[error("min_trade_interval_min must not be negative (got {value})")]
    NegativeInterval { value: i64 },

    #[error("state snapshot was produced by a different config (snapshot {snapshot}, current {current})")]
    SnapshotMismatch { snapshot: String, current: String },
}
