//! Agent-Based Model (ABM) of a two-sided commodity market
//!
//! Buyer and seller agents exchange a single commodity at a stochastically
//! evolving price. The crate provides the market model (agents, parameters,
//! shocks, aggregate statistics) and a step-driven simulation runner that a
//! display layer can configure, advance, and read back for charting.

pub mod application;
pub mod domain;

// Re-export key types at crate root
pub use application::simulation::{
    MarketSeries, RunState, SimulationConfig, SimulationHandle, SimulationMetrics,
    SimulationRunner, StepSample,
};
pub use domain::{Buyer, MarketModel, MarketParams, MarketStats, Seller, TradeProtocol, ValidationError};
