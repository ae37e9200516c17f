use crate::cluster::{ClusterDetector, ClusterResult};
use crate::world::World;
use anyhow::Result;
use flock_common::{AgentFrame, FlockConfig, Frame, HighlightRing, RenderOptions, StepSnapshot, SteeringParams, UpdateMode};
use log::{debug, info, trace};
use rand::prelude::*;

/// Outcome of one simulated step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// Number of completed steps, this one included.
    pub step: u64,
    pub cluster: ClusterResult,
}

/// Owns the flock and drives it one step at a time.
///
/// The caller controls the cadence; nothing here sleeps or blocks.
pub struct FlockSimulation {
    /// The configuration the simulation was built from.
    config: FlockConfig,
    world: World,
    detector: ClusterDetector,
    /// Live tunables, applied to every agent at the start of each step.
    params: SteeringParams,
    /// Seeded RNG for initial placement and highlight selection.
    rng: StdRng,
    current_step: u64,
    /// Clustering of the current positions.
    last_cluster: ClusterResult,
    recorded_snapshots: Vec<StepSnapshot>,
}

impl FlockSimulation {
    /// Creates a new simulation, placing the population from the configured seed.
    pub fn new(config: FlockConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.population.seed);

        let world = World::random(config.population.count, config.world.width, config.world.height, &mut rng)?
            .with_mode(config.world.update_mode);
        let detector = ClusterDetector::new(config.cluster_params());
        let last_cluster = detector.detect(&world.positions());
        let params = config.steering_params();

        info!(
            "Flock initialized: {} agents on {}x{} ({:?} update), {} initial clusters.",
            world.len(),
            world.width(),
            world.height(),
            world.mode(),
            last_cluster.count
        );

        Ok(Self {
            config,
            world,
            detector,
            params,
            rng,
            current_step: 0,
            last_cluster,
            recorded_snapshots: Vec::new(),
        })
    }

    /// Replaces the live tunables; they take effect on the next step.
    pub fn set_params(&mut self, params: SteeringParams) -> Result<()> {
        params.validate()?;
        debug!("Steering parameters updated: {:?}", params);
        self.params = params;
        Ok(())
    }

    pub fn set_update_mode(&mut self, mode: UpdateMode) {
        self.world.set_mode(mode);
    }

    /// Advances the flock by one step and clusters the resulting positions.
    pub fn step(&mut self) -> StepReport {
        self.world.step(&self.params);
        self.current_step += 1;

        let cluster = self.detector.detect(&self.world.positions());
        trace!(
            "Step {}: {} clusters, {} noise agents.",
            self.current_step,
            cluster.count,
            cluster.noise_count()
        );
        self.last_cluster = cluster.clone();

        StepReport { step: self.current_step, cluster }
    }

    /// Picks a random agent to highlight, as the display does at startup.
    pub fn choose_highlighted_agent(&mut self) -> Option<usize> {
        if self.world.is_empty() {
            return None;
        }
        Some(self.rng.random_range(0..self.world.len()))
    }

    /// Render-ready view of the current step.
    pub fn frame(&self, options: &RenderOptions) -> Frame {
        let highlight = options
            .highlighted_agent
            .filter(|_| options.show_highlight_radius)
            .and_then(|idx| self.world.agents().get(idx))
            .map(|agent| HighlightRing { center: agent.position, radius: agent.perception_radius });

        Frame {
            step: self.current_step,
            agents: self.agent_frames(),
            cluster_count: self.last_cluster.count,
            highlight,
        }
    }

    fn agent_frames(&self) -> Vec<AgentFrame> {
        self.world
            .agents()
            .iter()
            .map(|agent| AgentFrame { position: agent.position, heading: agent.heading() })
            .collect()
    }

    fn mean_speed(&self) -> f32 {
        if self.world.is_empty() {
            return 0.0;
        }
        let total: f32 = self.world.agents().iter().map(|agent| agent.velocity.length()).sum();
        total / self.world.len() as f32
    }

    /// Stores a metric record of the current step.
    pub fn record_snapshot(&mut self) {
        debug!("Recording snapshot at step {}...", self.current_step);

        let agents = if self.config.output.save_agents_in_snapshot {
            Some(self.agent_frames())
        } else {
            None
        };

        let snapshot = StepSnapshot {
            step: self.current_step,
            cluster_count: self.last_cluster.count,
            noise_count: self.last_cluster.noise_count(),
            cluster_sizes: self.last_cluster.cluster_sizes(),
            mean_speed: self.mean_speed(),
            agents,
        };
        self.recorded_snapshots.push(snapshot);
    }

    pub fn recorded_snapshots(&self) -> &[StepSnapshot] {
        &self.recorded_snapshots
    }

    pub fn last_cluster(&self) -> &ClusterResult {
        &self.last_cluster
    }

    pub fn current_step(&self) -> u64 {
        self.current_step
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn params(&self) -> &SteeringParams {
        &self.params
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }
}
