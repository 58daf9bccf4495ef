//! Domain types for the signal engine boundary.

pub mod fill;
pub mod lot;
pub mod market;
pub mod portfolio;
pub mod signal;

pub use fill::FillReport;
pub use lot::Lot;
pub use market::{MarketSnapshot, MarketView};
pub use portfolio::{PortfolioSnapshot, PortfolioView};
pub use signal::{Action, Signal};
