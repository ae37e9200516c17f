//! Flocking simulation with per-step density-based cluster detection.

pub mod agent;
pub mod cluster;
pub mod grid;
pub mod output;
pub mod simulation;
pub mod world;

pub use agent::Agent;
pub use cluster::{ClusterDetector, ClusterResult, NOISE};
pub use simulation::{FlockSimulation, StepReport};
pub use world::World;
