//! Environmental policy above the world: weather handling and ecological niches.

use crate::config::EnvironmentConfig;
use crate::sector::SectorLogic;
use crate::systems::lifecycle::timestamp;
use crate::world::World;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use sylva_data::{LiveEvent, Sector, WeatherEvent};

/// Characteristic conditions of a habitat type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcologicalNiche {
    pub name: String,
    pub sunlight_exposure: f64,
    pub organic_matter: f64,
    pub temperature_range: RangeInclusive<f64>,
    pub rainfall_range: RangeInclusive<f64>,
}

impl EcologicalNiche {
    #[must_use]
    pub fn admits(&self, sector: &Sector) -> bool {
        self.temperature_range.contains(&sector.temperature)
            && self.rainfall_range.contains(&sector.rainfall)
    }

    /// Distance of the sector's resources from the niche's typical values.
    #[must_use]
    pub fn distance(&self, sector: &Sector) -> f64 {
        (sector.sunlight_exposure - self.sunlight_exposure).abs()
            + (sector.organic_matter - self.organic_matter).abs()
    }
}

pub struct Environment {
    pub config: EnvironmentConfig,
    pub niches: Vec<EcologicalNiche>,
    rng: ChaCha8Rng,
}

impl Environment {
    #[must_use]
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self::with_rng(config, ChaCha8Rng::from_entropy())
    }

    #[must_use]
    pub fn with_seed(config: &EnvironmentConfig, seed: u64) -> Self {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn with_rng(config: &EnvironmentConfig, rng: ChaCha8Rng) -> Self {
        let mut env = Self {
            config: config.clone(),
            niches: Vec::new(),
            rng,
        };
        env.define_ecological_niches();
        env
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Installs the built-in niches, replacing any defined before.
    pub fn define_ecological_niches(&mut self) {
        self.niches = vec![
            EcologicalNiche {
                name: "forest".to_string(),
                sunlight_exposure: 50.0,
                organic_matter: 80.0,
                temperature_range: 10.0..=20.0,
                rainfall_range: 10.0..=20.0,
            },
            EcologicalNiche {
                name: "plains".to_string(),
                sunlight_exposure: 90.0,
                organic_matter: 40.0,
                temperature_range: 15.0..=30.0,
                rainfall_range: 5.0..=15.0,
            },
        ];
    }

    #[must_use]
    pub fn niche(&self, name: &str) -> Option<&EcologicalNiche> {
        self.niches.iter().find(|n| n.name == name)
    }

    /// The admitting niche closest to the sector's resources, if any admits it.
    #[must_use]
    pub fn classify(&self, sector: &Sector) -> Option<&EcologicalNiche> {
        self.niches
            .iter()
            .filter(|n| n.admits(sector))
            .min_by(|a, b| a.distance(sector).total_cmp(&b.distance(sector)))
    }

    /// Rolls for weather in every sector of the world.
    pub fn handle_weather_events(&mut self, world: &mut World) -> Vec<LiveEvent> {
        let mut events = Vec::new();
        for (index, sector) in world.sectors.iter_mut().enumerate() {
            if self.rng.gen::<f64>() >= self.config.weather_event_chance {
                continue;
            }
            let Some(&kind) = WeatherEvent::ALL.choose(&mut self.rng) else {
                continue;
            };
            Self::apply_weather_event(sector, kind);
            tracing::debug!(sector = index, event = %kind, "Weather event");
            events.push(LiveEvent::Weather {
                sector: index,
                kind,
                tick: world.tick,
                timestamp: timestamp(),
            });
        }
        world
            .metrics
            .add_to_counter("weather_events", events.len() as u64);
        events
    }

    pub fn apply_weather_event(sector: &mut Sector, kind: WeatherEvent) {
        sector.apply_weather(kind);
    }

    /// Weather first, then the world's sunlight and organic-matter passes.
    pub fn update_environment(&mut self, world: &mut World) -> Vec<LiveEvent> {
        let events = self.handle_weather_events(world);
        world.distribute_sunlight();
        world.accumulate_organic_matter();
        events
    }
}
