pub mod config;
pub mod params;
pub mod snapshot;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{ClusteringConfig, FlockConfig, OutputConfig, PopulationConfig, RunConfig, SteeringConfig, WorldConfig};
pub use params::{ClusterParams, RenderOptions, SteeringParams, UpdateMode};
pub use snapshot::{AgentFrame, Frame, HighlightRing, StepSnapshot};
pub use vecmath::{angle_to_vec, vec_to_angle, Vec2};
