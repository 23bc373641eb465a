//! Configuration management for simulation parameters.
//!
//! Strongly-typed sections that map onto a `config.toml` document. Every
//! field has a default, so a document only needs the keys it overrides.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 400
//! height = 300
//! sectors_per_axis = 4
//! seed = 42
//! deterministic = true
//!
//! [cells]
//! leaf_yield = 12.0
//!
//! [evolution]
//! mutation_rate = 0.02
//! ```

use serde::{Deserialize, Serialize};
use sylva_data::CellType;

/// World geometry and seeding.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    pub width: u32,
    pub height: u32,
    pub sectors_per_axis: u32,
    pub seed: Option<u64>,
    pub deterministic: bool,
    /// Per-sector chance of a random weather event during the world pass.
    pub random_event_chance: f64,
    pub initial_organisms: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1800,
            height: 1400,
            sectors_per_axis: 8,
            seed: None,
            deterministic: false,
            random_event_chance: 0.1,
            initial_organisms: 0,
        }
    }
}

/// Per-variant yields and costs.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct CellConfig {
    pub leaf_yield: f64,
    pub root_yield: f64,
    pub antenna_yield: f64,
    pub conduit_throughput: f64,
    pub brain_movement_cost: f64,
    pub seed_trickle: f64,
    pub offspring_energy: f64,
    pub offspring_type: CellType,
    pub founder_energy: f64,
}

impl Default for CellConfig {
    fn default() -> Self {
        Self {
            leaf_yield: 10.0,
            root_yield: 5.0,
            antenna_yield: 10.0,
            conduit_throughput: 10.0,
            brain_movement_cost: 10.0,
            seed_trickle: 0.1,
            offspring_energy: 100.0,
            offspring_type: CellType::Leaf,
            founder_energy: 100.0,
        }
    }
}

/// Coefficients the energy manager multiplies sector resources by.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EnergyConfig {
    pub leaf_photosynthesis: f64,
    pub antenna_photosynthesis: f64,
    pub root_nutrient_absorption: f64,
    pub brain_consumption_efficiency: f64,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            leaf_photosynthesis: 0.1,
            antenna_photosynthesis: 0.05,
            root_nutrient_absorption: 0.05,
            brain_consumption_efficiency: 0.5,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub weather_event_chance: f64,
    pub toxicity_threshold: f64,
    pub organic_accumulation: f64,
    pub toxic_accumulation: f64,
    pub death_organic_release: f64,
    pub energy_recycling_fraction: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            weather_event_chance: 0.1,
            toxicity_threshold: 100.0,
            organic_accumulation: 0.1,
            toxic_accumulation: 1.0,
            death_organic_release: 1.0,
            energy_recycling_fraction: 0.01,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Independent per-gene replacement probability.
    pub mutation_rate: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            mutation_rate: 0.01,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub cells: CellConfig,
    pub energy: EnergyConfig,
    pub environment: EnvironmentConfig,
    pub evolution: EvolutionConfig,
}

fn is_probability(p: f64) -> bool {
    (0.0..=1.0).contains(&p)
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        let w = &self.world;
        anyhow::ensure!(w.width > 0, "World width must be positive");
        anyhow::ensure!(w.height > 0, "World height must be positive");
        anyhow::ensure!(w.sectors_per_axis > 0, "Sectors per axis must be positive");
        anyhow::ensure!(
            w.sectors_per_axis <= w.width && w.sectors_per_axis <= w.height,
            "Sectors per axis must not exceed world dimensions"
        );
        anyhow::ensure!(
            w.width <= i32::MAX as u32 && w.height <= i32::MAX as u32,
            "World dimensions must fit signed grid coordinates"
        );
        anyhow::ensure!(
            is_probability(w.random_event_chance),
            "Random event chance must be in [0.0, 1.0]"
        );

        let c = &self.cells;
        for (name, value) in [
            ("Leaf yield", c.leaf_yield),
            ("Root yield", c.root_yield),
            ("Antenna yield", c.antenna_yield),
            ("Conduit throughput", c.conduit_throughput),
            ("Brain movement cost", c.brain_movement_cost),
            ("Seed trickle", c.seed_trickle),
            ("Offspring energy", c.offspring_energy),
            ("Founder energy", c.founder_energy),
        ] {
            anyhow::ensure!(value >= 0.0, "{name} must be non-negative");
        }
        anyhow::ensure!(
            matches!(c.offspring_type, CellType::Leaf | CellType::Seed),
            "Offspring type must be Leaf or Seed"
        );

        let e = &self.energy;
        for (name, value) in [
            ("Leaf photosynthesis", e.leaf_photosynthesis),
            ("Antenna photosynthesis", e.antenna_photosynthesis),
            ("Root nutrient absorption", e.root_nutrient_absorption),
            ("Brain consumption efficiency", e.brain_consumption_efficiency),
        ] {
            anyhow::ensure!(value >= 0.0, "{name} must be non-negative");
        }

        let env = &self.environment;
        anyhow::ensure!(
            is_probability(env.weather_event_chance),
            "Weather event chance must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            env.toxicity_threshold > 0.0,
            "Toxicity threshold must be positive"
        );
        anyhow::ensure!(
            env.organic_accumulation >= 0.0 && env.toxic_accumulation >= 0.0,
            "Organic accumulation rates must be non-negative"
        );
        anyhow::ensure!(
            env.death_organic_release >= 0.0,
            "Death organic release must be non-negative"
        );
        anyhow::ensure!(
            is_probability(env.energy_recycling_fraction),
            "Energy recycling fraction must be in [0.0, 1.0]"
        );

        anyhow::ensure!(
            is_probability(self.evolution.mutation_rate),
            "Mutation rate must be in [0.0, 1.0]"
        );

        Ok(())
    }

    /// Parses and validates a `config.toml` document.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Hash of the tunables that change simulation outcomes.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.cells).as_bytes());
        hasher.update(format!("{:?}", self.energy).as_bytes());
        hasher.update(format!("{:?}", self.environment).as_bytes());
        hasher.update(format!("{:?}", self.evolution).as_bytes());
        hex::encode(hasher.finalize())
    }
}
