//! Simulation Stepper
//!
//! Step-driven advancement of the market model: pair selection, trade,
//! time advance, interval-gated shocks, and the output series read by the
//! display layer.

mod runner;

pub use runner::{
    MarketSeries, RunState, SimulationConfig, SimulationHandle, SimulationMetrics,
    SimulationRunner, StepSample,
};
