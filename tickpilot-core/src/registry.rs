//! Strategy registry — host-owned mapping from name to constructor.
//!
//! Construction is explicit: the host builds a registry at startup and
//! passes it to whatever drives the engine. There is no process-wide
//! registration side effect.

use crate::config::{ConfigError, StrategyConfig};
use crate::engine::{AdaptiveMomentum, Strategy};
use std::collections::BTreeMap;

/// Constructor signature for registered strategies.
pub type StrategyCtor = fn(&StrategyConfig) -> Result<Box<dyn Strategy>, ConfigError>;

/// Errors from registry lookup or construction.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown strategy: {0}")]
    Unknown(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Name → constructor mapping. BTreeMap keeps `names()` deterministic.
#[derive(Default)]
pub struct StrategyRegistry {
    ctors: BTreeMap<String, StrategyCtor>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in strategies. The adaptive
    /// momentum engine is also reachable under its historical alias.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for name in [AdaptiveMomentum::NAME, AdaptiveMomentum::ALIAS] {
            registry.register(name, |config| {
                Ok(Box::new(AdaptiveMomentum::new(config.clone())?))
            });
        }
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, ctor: StrategyCtor) {
        self.ctors.insert(name.into(), ctor);
    }

    /// Construct a strategy by name with the given configuration.
    pub fn create(
        &self,
        name: &str,
        config: &StrategyConfig,
    ) -> Result<Box<dyn Strategy>, RegistryError> {
        let ctor = self
            .ctors
            .get(name)
            .ok_or_else(|| RegistryError::Unknown(name.to_string()))?;
        Ok(ctor(config)?)
    }

    /// Registered strategy names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.ctors.keys().map(String::as_str).collect()
    }
}
