use crate::vecmath::Vec2;
use serde::{Deserialize, Serialize};

/// Render-ready state of a single agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentFrame {
    pub position: Vec2,
    /// Direction of travel in radians.
    pub heading: f32,
}

/// Circle drawn around the highlighted agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighlightRing {
    pub center: Vec2,
    pub radius: f32,
}

/// Everything the rendering collaborator needs to draw one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub step: u64,
    pub agents: Vec<AgentFrame>,
    pub cluster_count: usize,
    pub highlight: Option<HighlightRing>,
}

/// A metric record of the flock at a specific step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSnapshot {
    /// Number of completed steps when the snapshot was taken.
    pub step: u64,
    pub cluster_count: usize,
    /// Agents that belong to no cluster.
    pub noise_count: usize,
    /// Member count per cluster id.
    pub cluster_sizes: Vec<usize>,
    pub mean_speed: f32,
    /// Included only if `config.output.save_agents_in_snapshot` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agents: Option<Vec<AgentFrame>>,
}
