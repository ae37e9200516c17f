use crate::agent::Agent;
use anyhow::Result;
use flock_common::{angle_to_vec, SteeringParams, UpdateMode, Vec2};
use rand::distr::Uniform;
use rand::prelude::*;
use rayon::prelude::*;

/// Initial speed range for randomly seeded agents.
const INITIAL_SPEED_MIN: f32 = 1.0;
const INITIAL_SPEED_MAX: f32 = 3.0;

/// The fixed agent population on a bounded toroidal plane.
#[derive(Debug, Clone)]
pub struct World {
    width: f32,
    height: f32,
    agents: Vec<Agent>,
    mode: UpdateMode,
}

impl World {
    pub fn new(width: f32, height: f32, agents: Vec<Agent>) -> Self {
        Self { width, height, agents, mode: UpdateMode::default() }
    }

    /// Places `count` agents uniformly over the plane with random headings
    /// and speeds in `[1, 3)`, drawn from `rng`.
    pub fn random<R: Rng + ?Sized>(count: usize, width: f32, height: f32, rng: &mut R) -> Result<Self> {
        let x_dist = Uniform::new(0.0f32, width)?;
        let y_dist = Uniform::new(0.0f32, height)?;
        let angle_dist = Uniform::new(0.0f32, std::f32::consts::TAU)?;
        let speed_dist = Uniform::new(INITIAL_SPEED_MIN, INITIAL_SPEED_MAX)?;

        let agents = (0..count)
            .map(|_| {
                let position = Vec2::new(rng.sample(&x_dist), rng.sample(&y_dist));
                let velocity = angle_to_vec(rng.sample(&angle_dist)).scale(rng.sample(&speed_dist));
                Agent::new(position, velocity)
            })
            .collect();
        Ok(Self::new(width, height, agents))
    }

    pub fn with_mode(mut self, mode: UpdateMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> UpdateMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: UpdateMode) {
        self.mode = mode;
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.agents.iter().map(|agent| agent.position).collect()
    }

    /// Advances every agent by one step under the current update mode.
    pub fn step(&mut self, params: &SteeringParams) {
        for agent in &mut self.agents {
            agent.apply_params(params);
        }
        match self.mode {
            UpdateMode::Sequential => self.step_sequential(params),
            UpdateMode::Synchronized => self.step_synchronized(params),
        }
    }

    // Each agent is wrapped, steered against the live population and integrated
    // before the next one moves. Order matters: do not parallelize.
    fn step_sequential(&mut self, params: &SteeringParams) {
        let (width, height) = (self.width, self.height);
        for idx in 0..self.agents.len() {
            self.agents[idx].wrap_edges(width, height);
            let force = self.agents[idx].flocking_force(idx, &self.agents, params);
            let agent = &mut self.agents[idx];
            agent.apply_force(force);
            agent.integrate();
            agent.wrap_edges(width, height);
        }
    }

    // Wrap all, compute every force from the frozen population (Parallel),
    // then integrate all.
    fn step_synchronized(&mut self, params: &SteeringParams) {
        let (width, height) = (self.width, self.height);
        for agent in &mut self.agents {
            agent.wrap_edges(width, height);
        }

        let population = &self.agents;
        let forces: Vec<Vec2> = population
            .par_iter()
            .enumerate()
            .map(|(idx, agent)| agent.flocking_force(idx, population, params))
            .collect();

        for (agent, force) in self.agents.iter_mut().zip(forces) {
            agent.apply_force(force);
            agent.integrate();
            agent.wrap_edges(width, height);
        }
    }
}
