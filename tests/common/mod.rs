pub mod macros;

use sylva_core::config::AppConfig;
use sylva_core::environment::Environment;
use sylva_core::world::{Organism, World};
use sylva_data::Position;

#[allow(dead_code)]
pub struct WorldBuilder {
    config: AppConfig,
    organisms: Vec<Position>,
    env_seed: u64,
}

#[allow(dead_code)]
impl WorldBuilder {
    /// Small, weather-free world with a fixed seed.
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.world.width = 60;
        config.world.height = 60;
        config.world.sectors_per_axis = 3;
        config.world.seed = Some(1);
        config.world.random_event_chance = 0.0;
        config.environment.weather_event_chance = 0.0;
        Self {
            config,
            organisms: Vec::new(),
            env_seed: 1,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self.env_seed = seed;
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_organism(mut self, x: i32, y: i32) -> Self {
        self.organisms.push(Position::new(x, y));
        self
    }

    pub fn build(self) -> (World, Environment, Vec<Organism>) {
        let env = Environment::with_seed(&self.config.environment, self.env_seed);
        let mut world = World::new(0, self.config).expect("Failed to create world in test builder");
        let organisms = self
            .organisms
            .into_iter()
            .map(|origin| {
                world
                    .seed_organism(origin)
                    .expect("Failed to seed organism in test builder")
            })
            .collect();
        (world, env, organisms)
    }
}
