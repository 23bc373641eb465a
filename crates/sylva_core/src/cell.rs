//! Behavior shared by every cell variant.
//!
//! Variant dispatch is a `match` on [`CellKind`]; anything that needs to see
//! other cells (forwarding, anchor checks) lives in the tick systems instead.

use crate::config::{CellConfig, EnergyConfig, EnvironmentConfig};
use crate::sector::SectorLogic;
use rand::Rng;
use sylva_data::{
    AntennaMode, Cell, CellId, CellInfo, CellKind, Genome, Position, Sector, Signals,
};

/// Matter a dead cell hands back to the sector it died in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Release {
    pub position: Position,
    pub organic_matter: f64,
}

pub fn new_cell(
    kind: CellKind,
    position: Position,
    energy: f64,
    genome: Genome,
    birth_tick: u64,
) -> Cell {
    Cell {
        position,
        energy: energy.max(0.0),
        genome,
        kind,
        alive: true,
        birth_tick,
    }
}

/// Builds a brain. Without an inherited genome the brain starts from the
/// founder genome.
pub fn new_brain(position: Position, energy: f64, inherited: Option<Genome>, tick: u64) -> Cell {
    new_cell(
        CellKind::Brain {
            signals_processed: 0,
        },
        position,
        energy,
        inherited.unwrap_or_else(Genome::founder),
        tick,
    )
}

/// Builds an antenna in gather mode with a random radio frequency.
pub fn new_antenna<R: Rng>(
    position: Position,
    energy: f64,
    conduit: Option<CellId>,
    tick: u64,
    rng: &mut R,
) -> Cell {
    new_cell(
        CellKind::Antenna {
            conduit,
            mode: AntennaMode::Gather,
            radio_frequency: rng.gen_range(0.1..10.0),
        },
        position,
        energy,
        Genome::default(),
        tick,
    )
}

/// Replaces each gene with probability `rate` by a uniform draw over `u8`.
///
/// Returns how many genes were redrawn. A redraw may land on the old value.
pub fn mutate_genome<R: Rng>(genome: &mut Genome, rate: f64, rng: &mut R) -> usize {
    let mut redrawn = 0;
    for gene in &mut genome.genes {
        if rng.gen::<f64>() < rate {
            *gene = rng.gen::<u8>();
            redrawn += 1;
        }
    }
    redrawn
}

pub trait CellLogic {
    /// Debits up to `amount`, clamping at zero. Returns what was actually taken.
    fn consume_energy(&mut self, amount: f64) -> f64;
    fn add_energy(&mut self, amount: f64);
    /// Overwrites the energy level, clamping at zero.
    fn set_energy(&mut self, amount: f64);
    fn mutate_with_rng<R: Rng>(&mut self, rate: f64, rng: &mut R) -> usize;
    /// Relocates the cell. Conduits are immobile and report `false`.
    fn move_to(&mut self, position: Position) -> bool;
    fn on_death(&mut self, config: &EnvironmentConfig) -> Release;
    fn info(&self, id: CellId) -> CellInfo;
    fn receive_signals(&mut self, signals: &Signals);
    /// The cell this one cannot act without.
    fn required_link(&self) -> Option<CellId>;
    /// Leaf, Root, and Antenna in gather mode.
    fn is_energy_producer(&self) -> bool;
    fn generate_energy(&self, sector: &Sector, cells: &CellConfig, env: &EnvironmentConfig)
        -> f64;
    fn photosynthesis_efficiency(&self, config: &EnergyConfig) -> f64;
    fn nutrient_absorption_efficiency(&self, config: &EnergyConfig) -> f64;
    fn consumption_efficiency(&self, config: &EnergyConfig) -> f64;
    /// Turns a seed into a brain, keeping position, energy and genome.
    fn into_brain(self) -> Cell;
}

impl CellLogic for Cell {
    fn consume_energy(&mut self, amount: f64) -> f64 {
        let taken = amount.max(0.0).min(self.energy);
        self.energy = (self.energy - taken).max(0.0);
        taken
    }

    fn add_energy(&mut self, amount: f64) {
        if self.alive {
            self.energy = (self.energy + amount).max(0.0);
        }
    }

    fn set_energy(&mut self, amount: f64) {
        self.energy = amount.max(0.0);
    }

    fn mutate_with_rng<R: Rng>(&mut self, rate: f64, rng: &mut R) -> usize {
        mutate_genome(&mut self.genome, rate, rng)
    }

    fn move_to(&mut self, position: Position) -> bool {
        if !self.alive || matches!(self.kind, CellKind::Conduit { .. }) {
            return false;
        }
        self.position = position;
        true
    }

    fn on_death(&mut self, config: &EnvironmentConfig) -> Release {
        let organic_matter = if self.alive {
            config.death_organic_release + self.energy * config.energy_recycling_fraction
        } else {
            0.0
        };
        self.alive = false;
        self.energy = 0.0;
        Release {
            position: self.position,
            organic_matter,
        }
    }

    fn info(&self, id: CellId) -> CellInfo {
        CellInfo {
            id,
            cell_type: self.cell_type(),
            position: self.position,
            energy: self.energy,
            genome: self.genome.clone(),
            conduit_cell_alive: None,
        }
    }

    fn receive_signals(&mut self, signals: &Signals) {
        if let CellKind::Brain { signals_processed } = &mut self.kind {
            *signals_processed += 1;
            tracing::trace!(entries = signals.len(), "Brain processed signals");
        }
    }

    fn required_link(&self) -> Option<CellId> {
        match &self.kind {
            CellKind::Leaf { conduit }
            | CellKind::Root { conduit }
            | CellKind::Antenna { conduit, .. } => *conduit,
            CellKind::Conduit { target } => target.map(|t| t.id()),
            CellKind::Seed { anchor } => Some(*anchor),
            CellKind::Brain { .. } => None,
        }
    }

    fn is_energy_producer(&self) -> bool {
        matches!(
            self.kind,
            CellKind::Leaf { .. }
                | CellKind::Root { .. }
                | CellKind::Antenna {
                    mode: AntennaMode::Gather,
                    ..
                }
        )
    }

    fn generate_energy(
        &self,
        sector: &Sector,
        cells: &CellConfig,
        env: &EnvironmentConfig,
    ) -> f64 {
        if !self.alive {
            return 0.0;
        }
        match &self.kind {
            CellKind::Leaf { .. } => sector.sunlight_intensity() * cells.leaf_yield,
            CellKind::Root { .. } => {
                sector.organic_concentration(env.toxicity_threshold) * cells.root_yield
            }
            CellKind::Antenna {
                mode: AntennaMode::Gather,
                ..
            } => cells.antenna_yield,
            _ => 0.0,
        }
    }

    fn photosynthesis_efficiency(&self, config: &EnergyConfig) -> f64 {
        match &self.kind {
            CellKind::Leaf { .. } => config.leaf_photosynthesis,
            CellKind::Antenna {
                mode: AntennaMode::Gather,
                ..
            } => config.antenna_photosynthesis,
            _ => 0.0,
        }
    }

    fn nutrient_absorption_efficiency(&self, config: &EnergyConfig) -> f64 {
        match &self.kind {
            CellKind::Root { .. } => config.root_nutrient_absorption,
            _ => 0.0,
        }
    }

    fn consumption_efficiency(&self, config: &EnergyConfig) -> f64 {
        match &self.kind {
            CellKind::Brain { .. } => config.brain_consumption_efficiency,
            _ => 0.0,
        }
    }

    fn into_brain(self) -> Cell {
        if !matches!(self.kind, CellKind::Seed { .. }) {
            return self;
        }
        let mut brain = new_brain(self.position, self.energy, Some(self.genome), self.birth_tick);
        brain.alive = self.alive;
        brain
    }
}
