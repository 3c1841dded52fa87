//! Daily tick driver over the managers

pub mod engine;

pub use engine::{SimulationEngine, TickReport, WorldEvent};
