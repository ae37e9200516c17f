use crate::params::{ClusterParams, SteeringParams, UpdateMode};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

// Bounds of the toroidal plane
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub update_mode: UpdateMode,
}

// Fixed population, seeded for reproducible initial headings and speeds
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PopulationConfig {
    pub count: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

// Initial values of the live tunables
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SteeringConfig {
    #[serde(default = "default_max_speed")]
    pub max_speed: f32,
    #[serde(default = "default_max_force")]
    pub max_force: f32,
    #[serde(default = "default_perception_radius")]
    pub perception_radius: f32,
    #[serde(default = "default_weight")]
    pub align_weight: f32,
    #[serde(default = "default_weight")]
    pub cohesion_weight: f32,
    #[serde(default = "default_weight")]
    pub separation_weight: f32,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ClusteringConfig {
    #[serde(default = "default_eps")]
    pub eps: f32,
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RunConfig {
    pub steps: u64,
    /// Record a snapshot every N steps (0 or 1 records every step).
    #[serde(default = "default_record_interval")]
    pub record_interval: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub base_filename: String,
    #[serde(default = "default_true")]
    pub save_snapshots: bool,
    pub format: Option<String>, // Output format: "json", "bincode", "messagepack"
    #[serde(default)]
    pub save_agents_in_snapshot: bool,
    #[serde(default = "default_true")]
    pub save_cluster_series: bool,
}

/// Main flock configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FlockConfig {
    pub world: WorldConfig,
    pub population: PopulationConfig,
    #[serde(default)]
    pub steering: SteeringConfig,
    #[serde(default)]
    pub clustering: ClusteringConfig,
    pub run: RunConfig,
    pub output: OutputConfig,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        let params = SteeringParams::default();
        SteeringConfig {
            max_speed: params.max_speed,
            max_force: params.max_force,
            perception_radius: params.perception_radius,
            align_weight: params.align_weight,
            cohesion_weight: params.cohesion_weight,
            separation_weight: params.separation_weight,
        }
    }
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        ClusteringConfig { eps: default_eps(), min_samples: default_min_samples() }
    }
}

impl FlockConfig {
    /// Loads the flock configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        let config = Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path_ref.display(), e))?;
        Ok(config)
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: FlockConfig = toml::from_str(config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.world.width > 0.0 && self.world.width.is_finite())
            || !(self.world.height > 0.0 && self.world.height.is_finite())
        {
            anyhow::bail!("world width and height must be positive.");
        }
        if self.population.count == 0 {
            anyhow::bail!("population count must be greater than 0.");
        }
        if !self.clustering.eps.is_finite() || self.clustering.eps < 0.0 {
            anyhow::bail!("clustering eps must be a finite non-negative number.");
        }
        self.steering_params().validate()?;
        Ok(())
    }

    /// Converts the steering section into the runtime tunables.
    pub fn steering_params(&self) -> SteeringParams {
        SteeringParams {
            max_speed: self.steering.max_speed,
            max_force: self.steering.max_force,
            perception_radius: self.steering.perception_radius,
            align_weight: self.steering.align_weight,
            cohesion_weight: self.steering.cohesion_weight,
            separation_weight: self.steering.separation_weight,
        }
    }

    pub fn cluster_params(&self) -> ClusterParams {
        ClusterParams { eps: self.clustering.eps, min_samples: self.clustering.min_samples }
    }
}

fn default_seed() -> u64 {
    42
}

fn default_max_speed() -> f32 {
    2.0
}

fn default_max_force() -> f32 {
    0.05
}

fn default_perception_radius() -> f32 {
    50.0
}

fn default_weight() -> f32 {
    1.0
}

fn default_eps() -> f32 {
    20.0
}

fn default_min_samples() -> usize {
    2
}

fn default_record_interval() -> u64 {
    1
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [world]
        width = 800.0
        height = 600.0

        [population]
        count = 100

        [run]
        steps = 10

        [output]
        base_filename = "flock"
    "#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = FlockConfig::from_toml_str(MINIMAL).expect("minimal config parses");
        assert_eq!(config.world.update_mode, UpdateMode::Sequential);
        assert_eq!(config.steering_params(), SteeringParams::default());
        assert_eq!(config.cluster_params(), ClusterParams::default());
        assert_eq!(config.population.seed, 42);
        assert!(config.output.save_cluster_series);
        assert!(!config.output.save_agents_in_snapshot);
    }

    #[test]
    fn parses_update_mode_and_overrides() {
        let text = MINIMAL.replace("height = 600.0", "height = 600.0\nupdate_mode = \"synchronized\"")
            + "\n[clustering]\neps = 12.5\nmin_samples = 4\n";
        let config = FlockConfig::from_toml_str(&text).expect("config parses");
        assert_eq!(config.world.update_mode, UpdateMode::Synchronized);
        assert_eq!(config.cluster_params(), ClusterParams { eps: 12.5, min_samples: 4 });
    }

    #[test]
    fn rejects_invalid_values() {
        let zero_count = MINIMAL.replace("count = 100", "count = 0");
        assert!(FlockConfig::from_toml_str(&zero_count).is_err());

        let bad_width = MINIMAL.replace("width = 800.0", "width = -5.0");
        assert!(FlockConfig::from_toml_str(&bad_width).is_err());

        let bad_radius = MINIMAL.to_string() + "\n[steering]\nperception_radius = -10.0\n";
        assert!(FlockConfig::from_toml_str(&bad_radius).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = FlockConfig::load("/definitely/not/here/config.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
