use crate::cell::CellLogic;
use crate::error::{NetworkError, Result};
use crate::network;
use crate::systems::lifecycle::{timestamp, CellPhaseContext, PhaseOutcome, Phases};
use crate::world::World;
use sylva_data::{CellId, CellInfo, CellKind, CellType, DeathCause, LiveEvent, Position, Signals};

impl World {
    /// Runs one cell's behavior outside the regular tick order.
    ///
    /// Releases from any death are deposited straight away; events are queued
    /// for the next [`World::update`].
    pub fn perform_action(&mut self, id: CellId) -> anyhow::Result<PhaseOutcome> {
        let outcome = {
            let ctx = CellPhaseContext {
                config: &self.config,
                sectors: &self.sectors,
                layout: &self.layout,
                tick: self.tick,
            };
            let mut phases = Phases::new(&ctx, &mut self.cells, &mut self.grid, &mut self.rng);
            phases.perform_action(id)?;
            phases.finish()
        };
        self.apply_releases(&outcome.releases);
        self.pending_events.extend(outcome.events.iter().cloned());
        Ok(outcome)
    }

    /// Removes a cell, depositing its release into its sector.
    pub fn kill_cell(&mut self, id: CellId, cause: DeathCause) -> bool {
        let Some(mut cell) = self.cells.despawn(id) else {
            return false;
        };
        let release = cell.on_death(&self.config.environment);
        self.grid.vacate(cell.position, id);
        self.apply_releases(&[release]);
        self.pending_events.push(LiveEvent::Death {
            id,
            cell_type: cell.cell_type(),
            cause,
            tick: self.tick,
            timestamp: timestamp(),
            x: cell.position.x,
            y: cell.position.y,
        });
        tracing::debug!(id = %id, cause = %cause, "Cell removed");
        true
    }

    /// Mutates a cell's genome at the configured rate. Returns the number of
    /// genes redrawn, or `None` for an unknown id.
    pub fn mutate_cell(&mut self, id: CellId) -> Option<usize> {
        let rate = self.config.evolution.mutation_rate;
        let cell = self.cells.get_mut(id)?;
        Some(cell.mutate_with_rng(rate, &mut self.rng))
    }

    /// Moves a cell on the grid. Conduits stay where they are and report `false`.
    pub fn move_cell(&mut self, id: CellId, to: Position) -> Result<bool> {
        let (from, immobile) = {
            let cell = self.cells.get(id).ok_or(NetworkError::UnknownCell(id))?;
            (cell.position, cell.cell_type() == CellType::Conduit)
        };
        if immobile {
            return Ok(false);
        }
        self.grid.relocate(from, to, id)?;
        Ok(self
            .cells
            .get_mut(id)
            .is_some_and(|cell| cell.move_to(to)))
    }

    /// Snapshot of one cell. Seeds also report whether their anchor is alive.
    #[must_use]
    pub fn cell_info(&self, id: CellId) -> Option<CellInfo> {
        let cell = self.cells.get(id)?;
        let mut info = cell.info(id);
        if let CellKind::Seed { anchor } = cell.kind {
            info.conduit_cell_alive = Some(self.cells.contains(anchor));
        }
        Some(info)
    }

    #[must_use]
    pub fn cell_infos(&self) -> Vec<CellInfo> {
        self.cells
            .ids()
            .into_iter()
            .filter_map(|id| self.cell_info(id))
            .collect()
    }

    /// Hands a signal payload to a brain.
    pub fn process_signals(&mut self, brain: CellId, signals: &Signals) -> Result<u64> {
        let cell = self
            .cells
            .get_mut(brain)
            .ok_or(NetworkError::UnknownCell(brain))?;
        cell.receive_signals(signals);
        match cell.kind {
            CellKind::Brain { signals_processed } => Ok(signals_processed),
            ref other => Err(NetworkError::wrong_type(
                brain,
                CellType::Brain,
                other.cell_type(),
            )),
        }
    }

    /// Live cell ids grouped by the sector they stand in, in sector order.
    #[must_use]
    pub fn residents_by_sector(&self) -> Vec<Vec<CellId>> {
        let mut residents = vec![Vec::new(); self.sectors.len()];
        for (id, cell) in self.cells.snapshot() {
            if let Some(bucket) = self
                .layout
                .index_of(cell.position)
                .and_then(|idx| residents.get_mut(idx))
            {
                bucket.push(id);
            }
        }
        residents
    }

    pub fn connect_to_conduit(&mut self, producer: CellId, conduit: CellId) -> Result<()> {
        network::connect_to_conduit(&mut self.cells, producer, conduit)
    }

    pub fn connect_to_brain(&mut self, conduit: CellId, brain: CellId) -> Result<()> {
        network::connect_to_brain(&mut self.cells, conduit, brain)
    }

    pub fn connect_to_next_conduit(&mut self, conduit: CellId, next: CellId) -> Result<()> {
        network::connect_to_next_conduit(&mut self.cells, conduit, next)
    }

    pub fn disconnect_conduit(&mut self, conduit: CellId) -> Result<()> {
        network::disconnect_conduit(&mut self.cells, conduit)
    }

    pub fn gather_mode(&mut self, antenna: CellId, conduit: CellId) -> Result<()> {
        network::gather_mode(&mut self.cells, antenna, conduit)
    }

    pub fn communicate_mode(&mut self, antenna: CellId, conduit: CellId) -> Result<()> {
        network::communicate_mode(&mut self.cells, antenna, conduit)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::AppConfig;
    use crate::world::World;
    use sylva_data::{CellType, DeathCause, Position, Signals};

    fn world() -> World {
        let mut config = AppConfig::default();
        config.world.width = 40;
        config.world.height = 40;
        config.world.sectors_per_axis = 2;
        config.world.seed = Some(3);
        World::new(0, config).unwrap()
    }

    #[test]
    fn test_seed_reports_anchor_state() {
        let mut w = world();
        let org = w.seed_organism(Position::new(5, 5)).unwrap();
        assert_eq!(w.cell_info(org.seed).unwrap().conduit_cell_alive, Some(true));
        assert_eq!(w.cell_info(org.leaf).unwrap().conduit_cell_alive, None);

        assert!(w.kill_cell(org.conduits[1], DeathCause::Exhausted));
        assert_eq!(w.cell_info(org.seed).unwrap().conduit_cell_alive, Some(false));
        assert!(!w.kill_cell(org.conduits[1], DeathCause::Exhausted));
    }

    #[test]
    fn test_conduits_do_not_move() {
        let mut w = world();
        let org = w.seed_organism(Position::new(5, 5)).unwrap();
        let target = Position::new(20, 20);

        assert!(!w.move_cell(org.conduits[0], target).unwrap());
        assert_eq!(w.grid.occupant(Position::new(5, 6)), Some(org.conduits[0]));

        assert!(w.move_cell(org.leaf, target).unwrap());
        assert_eq!(w.cells.get(org.leaf).unwrap().position, target);
        assert_eq!(w.grid.occupant(target), Some(org.leaf));
        assert!(w.grid.is_free(Position::new(4, 7)));

        assert!(w.move_cell(org.root, target).is_err());
    }

    #[test]
    fn test_kill_releases_into_sector() {
        let mut w = world();
        let org = w.seed_organism(Position::new(5, 5)).unwrap();
        let before = w.sectors[0].organic_matter;
        w.kill_cell(org.leaf, DeathCause::Exhausted);
        // 1.0 base release + 1% of 100 held energy
        assert!((w.sectors[0].organic_matter - before - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_process_signals_counts_payloads() {
        let mut w = world();
        let org = w.seed_organism(Position::new(5, 5)).unwrap();
        let signals = Signals::new();
        assert_eq!(w.process_signals(org.brain, &signals).unwrap(), 1);
        assert_eq!(w.process_signals(org.brain, &signals).unwrap(), 2);
        assert!(w.process_signals(org.leaf, &signals).is_err());
    }

    #[test]
    fn test_residents_grouped_by_sector() {
        let mut w = world();
        w.seed_organism(Position::new(5, 5)).unwrap();
        w.seed_organism(Position::new(30, 30)).unwrap();
        let residents = w.residents_by_sector();
        assert_eq!(residents[0].len(), 7);
        assert_eq!(residents[3].len(), 7);
        assert!(residents[1].is_empty() && residents[2].is_empty());
    }

    #[test]
    fn test_single_action_kills_disconnected_conduit() {
        let mut w = world();
        let org = w.seed_organism(Position::new(5, 5)).unwrap();
        w.disconnect_conduit(org.conduits[0]).unwrap();
        let outcome = w.perform_action(org.conduits[0]).unwrap();
        assert_eq!(outcome.report.deaths, 1);
        assert_eq!(outcome.report.forwarded, 0.0);
        assert_eq!(w.cells.cell_type(org.conduits[0]), None);
        assert_eq!(w.cells.cell_type(org.brain), Some(CellType::Brain));
    }
}
