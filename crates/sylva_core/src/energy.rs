//! Energy budgeting between sectors and cells.
//!
//! Allocation is a direct **set** of the cell's energy level, not a credit:
//! a cell allocated in a tick must not also be credited for the same sources.

use crate::cell::CellLogic;
use crate::config::EnergyConfig;
use crate::world::World;
use sylva_data::{Cell, Sector};

/// Where a cell may draw energy from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnergySource {
    Sunlight,
    OrganicMatter,
    CellConsumption,
}

impl EnergySource {
    pub const ALL: [EnergySource; 3] = [
        EnergySource::Sunlight,
        EnergySource::OrganicMatter,
        EnergySource::CellConsumption,
    ];

    /// Sources summed by [`EnergyManager::allocate_energy`].
    #[must_use]
    pub fn is_ambient(self) -> bool {
        !matches!(self, EnergySource::CellConsumption)
    }
}

#[derive(Debug, Clone, Default)]
pub struct EnergyManager {
    pub config: EnergyConfig,
}

impl EnergyManager {
    #[must_use]
    pub fn new(config: EnergyConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn sunlight_energy(&self, cell: &Cell, sector: &Sector) -> f64 {
        sector.sunlight_exposure.max(0.0) * cell.photosynthesis_efficiency(&self.config)
    }

    #[must_use]
    pub fn organic_matter_energy(&self, cell: &Cell, sector: &Sector) -> f64 {
        sector.organic_matter.max(0.0) * cell.nutrient_absorption_efficiency(&self.config)
    }

    /// Energy `cell` would gain by consuming `target`. Never part of the
    /// summed allocation; callers invoke it explicitly.
    #[must_use]
    pub fn cell_consumption_energy(&self, cell: &Cell, target: &Cell) -> f64 {
        target.energy.max(0.0) * cell.consumption_efficiency(&self.config)
    }

    #[must_use]
    pub fn source_energy(&self, source: EnergySource, cell: &Cell, sector: &Sector) -> f64 {
        match source {
            EnergySource::Sunlight => self.sunlight_energy(cell, sector),
            EnergySource::OrganicMatter => self.organic_matter_energy(cell, sector),
            EnergySource::CellConsumption => 0.0,
        }
    }

    /// Sets the cell's energy to the sum of its ambient sources and returns it.
    pub fn allocate_energy(&self, cell: &mut Cell, sector: &Sector) -> f64 {
        let total: f64 = EnergySource::ALL
            .iter()
            .filter(|s| s.is_ambient())
            .map(|&s| self.source_energy(s, cell, sector))
            .sum();
        cell.set_energy(total);
        total
    }

    /// Per-tick driver: allocates every energy producer from the sector it
    /// stands in. Conduits, brains and seeds keep what the network gave them.
    pub fn update_energy_distribution(&self, world: &mut World) -> f64 {
        let residents = world.residents_by_sector();
        let mut allocated = 0.0;
        for (index, ids) in residents.iter().enumerate() {
            let Some(sector) = world.sectors.get(index) else {
                continue;
            };
            for &id in ids {
                if let Some(cell) = world.cells.get_mut(id) {
                    if cell.is_energy_producer() {
                        allocated += self.allocate_energy(cell, sector);
                    }
                }
            }
        }
        allocated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{new_brain, new_cell};
    use sylva_data::{AntennaMode, CellKind, Genome, Position};

    fn sector(sun: f64, organic: f64) -> Sector {
        Sector {
            sunlight_exposure: sun,
            organic_matter: organic,
            ..Sector::new(0, 0, 10, 10)
        }
    }

    fn cell(kind: CellKind, energy: f64) -> Cell {
        new_cell(kind, Position::new(1, 1), energy, Genome::default(), 0)
    }

    #[test]
    fn test_leaf_draws_sunlight_only() {
        let manager = EnergyManager::default();
        let leaf = cell(CellKind::Leaf { conduit: None }, 0.0);
        let s = sector(80.0, 40.0);
        assert!((manager.sunlight_energy(&leaf, &s) - 8.0).abs() < 1e-9);
        assert_eq!(manager.organic_matter_energy(&leaf, &s), 0.0);
    }

    #[test]
    fn test_root_draws_organic_matter_only() {
        let manager = EnergyManager::default();
        let root = cell(CellKind::Root { conduit: None }, 0.0);
        let s = sector(80.0, 40.0);
        assert_eq!(manager.sunlight_energy(&root, &s), 0.0);
        assert!((manager.organic_matter_energy(&root, &s) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_allocation_sets_rather_than_adds() {
        let manager = EnergyManager::default();
        let mut antenna = cell(
            CellKind::Antenna {
                conduit: None,
                mode: AntennaMode::Gather,
                radio_frequency: 1.0,
            },
            500.0,
        );
        let total = manager.allocate_energy(&mut antenna, &sector(60.0, 0.0));
        assert!((total - 3.0).abs() < 1e-9);
        assert!((antenna.energy - 3.0).abs() < 1e-9);

        manager.allocate_energy(&mut antenna, &sector(60.0, 0.0));
        assert!((antenna.energy - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_consumption_is_explicit() {
        let manager = EnergyManager::default();
        let brain = new_brain(Position::new(0, 0), 10.0, None, 0);
        let prey = cell(CellKind::Leaf { conduit: None }, 30.0);
        assert!((manager.cell_consumption_energy(&brain, &prey) - 15.0).abs() < 1e-9);
        assert_eq!(manager.cell_consumption_energy(&prey, &brain), 0.0);

        let mut brain = brain;
        manager.allocate_energy(&mut brain, &sector(100.0, 100.0));
        assert_eq!(brain.energy, 0.0);
    }

    #[test]
    fn test_negative_sector_scalars_give_nothing() {
        let manager = EnergyManager::default();
        let mut leaf = cell(CellKind::Leaf { conduit: None }, 5.0);
        manager.allocate_energy(&mut leaf, &sector(-20.0, -3.0));
        assert_eq!(leaf.energy, 0.0);
    }
}
