//! Fill report — the driver's callback after executing a decision.

use super::signal::Action;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Execution report the driver sends back after (simulated or real) fill.
///
/// Omitting this call after a non-hold decision desynchronizes the engine's
/// lot/P&L tracking from the true portfolio — the contract is one report
/// per executed decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillReport {
    pub action: Action,
    pub price: f64,
    pub size: f64,
    pub timestamp: DateTime<Utc>,
}
