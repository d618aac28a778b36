//! Domain layer: Pure market model and value objects

mod agents;
mod error;
mod market;
mod params;

pub use agents::{Buyer, Seller, TradeProtocol};
pub use error::ValidationError;
pub use market::{MarketModel, MarketStats};
pub use params::MarketParams;
