use flock_common::{SteeringParams, Vec2};

/// An autonomous point mass following the alignment, cohesion and separation rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Steering accumulated during the current step; zeroed by `integrate`.
    pub acceleration: Vec2,
    pub perception_radius: f32,
    pub max_speed: f32,
    pub max_force: f32,
}

impl Agent {
    /// Creates an agent with the default tunables.
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        let params = SteeringParams::default();
        Self {
            position,
            velocity,
            acceleration: Vec2::zero(),
            perception_radius: params.perception_radius,
            max_speed: params.max_speed,
            max_force: params.max_force,
        }
    }

    /// Copies the per-agent limits from the live tunables.
    pub fn apply_params(&mut self, params: &SteeringParams) {
        self.max_speed = params.max_speed;
        self.max_force = params.max_force;
        self.perception_radius = params.perception_radius;
    }

    pub fn heading(&self) -> f32 {
        self.velocity.heading()
    }

    /// Toroidal wrap: a coordinate past a bound snaps to the opposite edge.
    /// Only handles crossings of less than one bound width per step.
    pub fn wrap_edges(&mut self, width: f32, height: f32) {
        if self.position.x > width {
            self.position.x = 0.0;
        } else if self.position.x < 0.0 {
            self.position.x = width;
        }

        if self.position.y > height {
            self.position.y = 0.0;
        } else if self.position.y < 0.0 {
            self.position.y = height;
        }
    }

    /// Other agents strictly within `radius`, identified by index rather than value.
    fn neighbors<'a>(
        &'a self,
        self_index: usize,
        population: &'a [Agent],
        radius: f32,
    ) -> impl Iterator<Item = (&'a Agent, f32)> + 'a {
        population
            .iter()
            .enumerate()
            .filter(move |(idx, _)| *idx != self_index)
            .map(move |(_, other)| (other, self.position.distance(other.position)))
            .filter(move |(_, d)| *d < radius)
    }

    // Reynolds steering: desired at full speed, minus current velocity, clamped.
    fn steer(&self, mut desired: Vec2) -> Vec2 {
        desired.set_magnitude(self.max_speed);
        let mut steering = desired - self.velocity;
        steering.limit(self.max_force);
        steering
    }

    /// Steer towards the average velocity of neighbors.
    pub fn align(&self, self_index: usize, population: &[Agent]) -> Vec2 {
        let mut avg_velocity = Vec2::zero();
        let mut total = 0usize;
        for (other, _) in self.neighbors(self_index, population, self.perception_radius) {
            avg_velocity += other.velocity;
            total += 1;
        }
        if total == 0 {
            return Vec2::zero();
        }
        avg_velocity.divide(total as f32);
        self.steer(avg_velocity)
    }

    /// Steer towards the centroid of neighbors.
    pub fn cohesion(&self, self_index: usize, population: &[Agent]) -> Vec2 {
        let mut center_of_mass = Vec2::zero();
        let mut total = 0usize;
        for (other, _) in self.neighbors(self_index, population, self.perception_radius) {
            center_of_mass += other.position;
            total += 1;
        }
        if total == 0 {
            return Vec2::zero();
        }
        center_of_mass.divide(total as f32);
        self.steer(center_of_mass - self.position)
    }

    /// Steer away from neighbors closer than half the perception radius,
    /// weighted by inverse distance. Coincident agents are ignored.
    pub fn separation(&self, self_index: usize, population: &[Agent]) -> Vec2 {
        let mut avg_repulsion = Vec2::zero();
        let mut total = 0usize;
        for (other, distance) in self.neighbors(self_index, population, self.perception_radius / 2.0) {
            if distance > 0.0 {
                let mut diff = self.position - other.position;
                diff.divide(distance);
                avg_repulsion += diff;
                total += 1;
            }
        }
        if total == 0 {
            return Vec2::zero();
        }
        avg_repulsion.divide(total as f32);
        self.steer(avg_repulsion)
    }

    /// Weighted sum of the three rules against `population`.
    /// `self_index` is this agent's slot in `population`.
    pub fn flocking_force(&self, self_index: usize, population: &[Agent], params: &SteeringParams) -> Vec2 {
        let alignment = self.align(self_index, population) * params.align_weight;
        let cohesion = self.cohesion(self_index, population) * params.cohesion_weight;
        let separation = self.separation(self_index, population) * params.separation_weight;
        alignment + cohesion + separation
    }

    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    /// Moves by the current velocity, then folds in the accumulated steering.
    pub fn integrate(&mut self) {
        self.position += self.velocity;
        self.velocity += self.acceleration;
        self.velocity.limit(self.max_speed);
        self.acceleration = Vec2::zero();
    }
}
