//! Decision record emitted once per evaluation tick.

use serde::{Deserialize, Serialize};

/// The three possible decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Hold,
    Buy,
    Sell,
}

/// One trade decision: action, sized quantity, and a human-readable
/// justification. `size` is a quantity of the underlying asset (not
/// notional currency) and is always zero for `Hold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub action: Action,
    pub size: f64,
    pub reason: String,
}

impl Signal {
    pub fn hold(reason: impl Into<String>) -> Self {
        Self {
            action: Action::Hold,
            size: 0.0,
            reason: reason.into(),
        }
    }

    pub fn buy(size: f64, reason: impl Into<String>) -> Self {
        Self {
            action: Action::Buy,
            size,
            reason: reason.into(),
        }
    }

    pub fn sell(size: f64, reason: impl Into<String>) -> Self {
        Self {
            action: Action::Sell,
            size,
            reason: reason.into(),
        }
    }

    pub fn is_hold(&self) -> bool {
        self.action == Action::Hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hold_has_zero_size() {
        let signal = Signal::hold("no clear signals");
        assert_eq!(signal.action, Action::Hold);
        assert_eq!(signal.size, 0.0);
    }

    #[test]
    fn action_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Action::Buy).unwrap(), "\"buy\"");
        assert_eq!(serde_json::to_string(&Action::Hold).unwrap(), "\"hold\"");
    }

    #[test]
    fn signal_serialization_roundtrip() {
        let signal = Signal::sell(2.5, "Stop loss triggered");
        let json = serde_json::to_string(&signal).unwrap();
        let deser: Signal = serde_json::from_str(&json).unwrap();
        assert_eq!(signal, deser);
    }
}
