use crate::cell::Release;
use crate::environment::Environment;
use crate::sector::SectorLogic;
use crate::systems::lifecycle::{run_cell_phases, timestamp, CellPhaseContext};
use crate::world::World;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Instant;
use sylva_data::LiveEvent;

impl World {
    /// Advances the simulation by one tick.
    ///
    /// Order within a tick:
    /// - season advance (world layer)
    /// - one weather roll per sector, then sunlight and organic matter
    ///   (environment layer)
    /// - cell phases: producers, conduits upstream-first, brains, seeds
    /// - death releases deposited into sectors
    /// - energy allocation for producers
    ///
    /// # Returns
    /// Births, deaths, activations and weather events raised since the last update.
    pub fn update(&mut self, env: &mut Environment) -> anyhow::Result<Vec<LiveEvent>> {
        let start = Instant::now();
        self.tick += 1;

        if self.config.world.deterministic {
            let seed = self
                .config
                .world
                .seed
                .unwrap_or(0)
                .wrapping_add(self.tick)
                .wrapping_add(0x5EED);
            self.rng = ChaCha8Rng::seed_from_u64(seed);
            env.reseed(seed.rotate_left(17));
        }

        let mut events = std::mem::take(&mut self.pending_events);
        self.seasonal_cycle();
        events.extend(env.update_environment(self));

        let outcome = {
            let ctx = CellPhaseContext {
                config: &self.config,
                sectors: &self.sectors,
                layout: &self.layout,
                tick: self.tick,
            };
            run_cell_phases(&ctx, &mut self.cells, &mut self.grid, &mut self.rng)?
        };
        self.apply_releases(&outcome.releases);

        let manager = self.energy.clone();
        manager.update_energy_distribution(self);

        let report = &outcome.report;
        self.metrics.add_to_counter("births", report.births as u64);
        self.metrics.add_to_counter("deaths", report.deaths as u64);
        self.metrics
            .add_to_counter("activations", report.activations as u64);
        self.metrics.record_tick(start.elapsed(), self.cells.len());

        tracing::trace!(
            tick = self.tick,
            produced = report.produced,
            delivered = report.delivered,
            births = report.births,
            deaths = report.deaths,
            "Tick complete"
        );

        self.last_report = outcome.report;
        events.extend(outcome.events);
        Ok(events)
    }

    /// World-layer environmental pass: season advance, then random weather.
    ///
    /// For driving a world without an [`Environment`]. [`World::update`] only
    /// advances the season here and leaves weather to the environment layer.
    pub fn update_environment(&mut self) -> Vec<LiveEvent> {
        self.seasonal_cycle();
        self.dynamic_environmental_changes()
    }

    /// Advances the season by one step and applies its preset to every sector.
    pub fn seasonal_cycle(&mut self) {
        self.season = self.season.next();
        for sector in &mut self.sectors {
            sector.update_season(self.season);
        }
    }

    /// Each sector independently rolls for a random weather event.
    pub fn dynamic_environmental_changes(&mut self) -> Vec<LiveEvent> {
        let chance = self.config.world.random_event_chance;
        let mut events = Vec::new();
        for (index, sector) in self.sectors.iter_mut().enumerate() {
            if self.rng.gen::<f64>() < chance {
                let kind = sector.random_event(&mut self.rng);
                events.push(LiveEvent::Weather {
                    sector: index,
                    kind,
                    tick: self.tick,
                    timestamp: timestamp(),
                });
            }
        }
        self.metrics
            .add_to_counter("weather_events", events.len() as u64);
        events
    }

    pub fn distribute_sunlight(&mut self) {
        for sector in &mut self.sectors {
            sector.update_sunlight();
        }
    }

    pub fn accumulate_organic_matter(&mut self) {
        let config = &self.config.environment;
        for sector in &mut self.sectors {
            sector.update_organic_matter(config);
        }
    }

    /// Deposits death releases into the sector each cell died in.
    pub fn apply_releases(&mut self, releases: &[Release]) {
        for release in releases {
            let Some(index) = self.layout.index_of(release.position) else {
                continue;
            };
            if let Some(sector) = self.sectors.get_mut(index) {
                sector.deposit_organic_matter(release.organic_matter);
            }
        }
    }
}
