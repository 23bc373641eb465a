//! # Sylva
//!
//! A plant-like organism simulation: leaves, roots and antennas gather energy,
//! conduit chains carry it to a brain, and the brain grows new cells while the
//! seasons and the weather reshape the world around it.
//!
//! [`Simulation`] bundles a [`World`] with its [`Environment`] and is the entry
//! point for embedding programs. Everything else lives in `sylva_core` and
//! `sylva_data`.

use sylva_core::config::AppConfig;
use sylva_core::environment::Environment;
use sylva_core::world::World;
use sylva_data::{CellInfo, LiveEvent};

pub use sylva_core as core;
pub use sylva_data as data;

/// Offset mixed into the world seed so the environment draws its own stream.
const ENVIRONMENT_SEED_SALT: u64 = 0xE4E1_0000;

pub struct Simulation {
    pub world: World,
    pub env: Environment,
}

impl Simulation {
    /// Builds a world seeded with `config.world.initial_organisms` founders.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let env = match config.world.seed {
            Some(seed) => {
                Environment::with_seed(&config.environment, seed ^ ENVIRONMENT_SEED_SALT)
            }
            None => Environment::new(&config.environment),
        };
        let world = World::new(config.world.initial_organisms, config)?;
        tracing::info!(
            fingerprint = %world.config.fingerprint(),
            cells = world.cells.len(),
            "Simulation ready"
        );
        Ok(Self { world, env })
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Self::new(AppConfig::from_toml(content)?)
    }

    pub fn step(&mut self) -> anyhow::Result<Vec<LiveEvent>> {
        self.world.update(&mut self.env)
    }

    /// Runs `ticks` updates and returns every event raised along the way.
    /// Stops early once the last cell is gone.
    pub fn run(&mut self, ticks: u64) -> anyhow::Result<Vec<LiveEvent>> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            events.extend(self.step()?);
            if self.world.cells.is_empty() {
                tracing::info!(tick = self.world.tick, "Organism extinct");
                break;
            }
        }
        Ok(events)
    }

    #[must_use]
    pub fn cells(&self) -> Vec<CellInfo> {
        self.world.cell_infos()
    }

    /// JSON array of every live cell.
    pub fn snapshot_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(&self.cells())?)
    }
}
