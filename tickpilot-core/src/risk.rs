//! Risk governor — drawdown ceiling and trade throttle.
//!
//! Both checks are hard vetoes applied before any decision logic runs.
//! The drawdown veto is stateless per call, not a one-way latch: if price
//! recovery pulls the computed drawdown back under the ceiling, trading
//! resumes.

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

/// Verdict of a drawdown observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RiskVerdict {
    Allowed,
    Blocked { drawdown_pct: f64 },
}

impl RiskVerdict {
    pub fn is_blocked(&self) -> bool {
        matches!(self, RiskVerdict::Blocked { .. })
    }
}

/// Tracks the running portfolio peak and the time-since-last-trade throttle.
#[derive(Debug, Clone)]
pub struct RiskGovernor {
    peak_value: Option<f64>,
    max_drawdown_limit: f64,
    last_trade: Option<DateTime<Utc>>,
    min_trade_interval: Duration,
}

impl RiskGovernor {
    pub fn new(max_drawdown_limit: f64, min_trade_interval_min: i64) -> Self {
        Self {
            peak_value: None,
            max_drawdown_limit,
            last_trade: None,
            min_trade_interval: Duration::minutes(min_trade_interval_min),
        }
    }

    /// Observe the current portfolio value and judge the drawdown.
    ///
    /// The peak only moves upward. With no meaningful peak yet (zero or
    /// uninitialized) there is no drawdown to measure, so the verdict is
    /// always `Allowed`.
    pub fn observe(&mut self, current_value: f64) -> RiskVerdict {
        let peak = match self.peak_value {
            Some(peak) => peak.max(current_value),
            None => current_value,
        };
        self.peak_value = Some(peak);

        if peak <= 0.0 {
            return RiskVerdict::Allowed;
        }

        let drawdown_pct = (peak - current_value) / peak * 100.0;
        if drawdown_pct >= self.max_drawdown_limit {
            warn!(
                drawdown_pct,
                limit = self.max_drawdown_limit,
                "drawdown limit exceeded"
            );
            RiskVerdict::Blocked { drawdown_pct }
        } else {
            RiskVerdict::Allowed
        }
    }

    /// Whether the minimum interval since the last trade has elapsed.
    /// Always true before the first recorded trade.
    pub fn can_trade(&self, now: DateTime<Utc>) -> bool {
        match self.last_trade {
            Some(last) => now - last >= self.min_trade_interval,
            None => true,
        }
    }

    /// Record a trade execution for the throttle.
    pub fn record_trade(&mut self, timestamp: DateTime<Utc>) {
        self.last_trade = Some(timestamp);
    }

    pub fn peak_value(&self) -> Option<f64> {
        self.peak_value
    }

    pub fn last_trade(&self) -> Option<DateTime<Utc>> {
        self.last_trade
    }

    /// Rebuild a governor from exported state.
    pub fn from_parts(
        max_drawdown_limit: f64,
        min_trade_interval_min: i64,
        peak_value: Option<f64>,
        last_trade: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            peak_value,
            max_drawdown_limit,
            last_trade,
            min_trade_interval: Duration::minutes(min_trade_interval_min),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, minute, 0).unwrap()
    }

    #[test]
    fn first_observation_sets_peak_and_allows() {
        let mut governor = RiskGovernor::new(45.0, 30);
        assert_eq!(governor.observe(10_000.0), RiskVerdict::Allowed);
        assert_eq!(governor.peak_value(), Some(10_000.0));
    }

    #[test]
    fn peak_only_moves_upward() {
        let mut governor = RiskGovernor::new(45.0, 30);
        governor.observe(10_000.0);
        governor.observe(8_000.0);
        assert_eq!(governor.peak_value(), Some(10_000.0));
        governor.observe(12_000.0);
        assert_eq!(governor.peak_value(), Some(12_000.0));
    }

    #[test]
    fn blocks_at_the_ceiling() {
        let mut governor = RiskGovernor::new(45.0, 30);
        governor.observe(10_000.0);
        // 45% drawdown exactly → blocked (>=)
        let verdict = governor.observe(5_500.0);
        assert!(verdict.is_blocked());
        if let RiskVerdict::Blocked { drawdown_pct } = verdict {
            assert!((drawdown_pct - 45.0).abs() < 1e-10);
        }
    }

    #[test]
    fn veto_releases_on_recovery() {
        let mut governor = RiskGovernor::new(45.0, 30);
        governor.observe(10_000.0);
        assert!(governor.observe(5_000.0).is_blocked());
        // Recovery below the ceiling lifts the veto — not a latch.
        assert_eq!(governor.observe(8_000.0), RiskVerdict::Allowed);
    }

    #[test]
    fn zero_peak_always_allows() {
        let mut governor = RiskGovernor::new(45.0, 30);
        assert_eq!(governor.observe(0.0), RiskVerdict::Allowed);
        assert_eq!(governor.observe(0.0), RiskVerdict::Allowed);
    }

    #[test]
    fn throttle_allows_before_first_trade() {
        let governor = RiskGovernor::new(45.0, 30);
        assert!(governor.can_trade(ts(0)));
    }

    #[test]
    fn throttle_blocks_inside_interval_and_releases_after() {
        let mut governor = RiskGovernor::new(45.0, 30);
        governor.record_trade(ts(0));
        assert!(!governor.can_trade(ts(15)));
        assert!(!governor.can_trade(ts(29)));
        assert!(governor.can_trade(ts(30)));
    }

    #[test]
    fn zero_interval_never_throttles() {
        let mut governor = RiskGovernor::new(45.0, 0);
        governor.record_trade(ts(0));
        assert!(governor.can_trade(ts(0)));
    }
}
