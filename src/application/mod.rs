//! Application layer: Simulation orchestration

pub mod simulation;
