use serde::{Deserialize, Serialize};

/// The six live tunables read once per step.
/// May change between steps without restarting the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteeringParams {
    pub max_speed: f32,
    pub max_force: f32,
    pub perception_radius: f32,
    pub align_weight: f32,
    pub cohesion_weight: f32,
    pub separation_weight: f32,
}

impl Default for SteeringParams {
    fn default() -> Self {
        Self {
            max_speed: 2.0,
            max_force: 0.05,
            perception_radius: 50.0,
            align_weight: 1.0,
            cohesion_weight: 1.0,
            separation_weight: 1.0,
        }
    }
}

impl SteeringParams {
    /// Rejects negative or non-finite values before they reach the agents.
    pub fn validate(&self) -> anyhow::Result<()> {
        let limits = [
            ("max_speed", self.max_speed),
            ("max_force", self.max_force),
            ("perception_radius", self.perception_radius),
        ];
        for (name, value) in limits {
            if !value.is_finite() || value < 0.0 {
                anyhow::bail!("{} must be a finite non-negative number (got {}).", name, value);
            }
        }
        let weights = [
            ("align_weight", self.align_weight),
            ("cohesion_weight", self.cohesion_weight),
            ("separation_weight", self.separation_weight),
        ];
        for (name, value) in weights {
            if !value.is_finite() {
                anyhow::bail!("{} must be finite (got {}).", name, value);
            }
        }
        Ok(())
    }
}

/// Parameters of the density-based clustering pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterParams {
    /// Neighborhood radius.
    pub eps: f32,
    /// Minimum neighborhood size (the point itself included) for a core point.
    pub min_samples: usize,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self { eps: 20.0, min_samples: 2 }
    }
}

/// How agents are advanced within one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    /// Wrap, steer and integrate one agent fully before the next. Later agents
    /// see earlier agents at their already-advanced state.
    #[default]
    Sequential,
    /// Compute every steering force from a frozen population, then integrate all.
    Synchronized,
}

/// Display hints for the rendering collaborator. Passed at call time only;
/// the simulation never stores it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub show_highlight_radius: bool,
    /// Index of the agent whose perception radius is drawn.
    pub highlighted_agent: Option<usize>,
}
