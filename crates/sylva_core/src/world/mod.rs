//! The world: sectors, the season cycle, and the registry of live cells.

use crate::config::AppConfig;
use crate::energy::EnergyManager;
use crate::metrics::Metrics;
use crate::registry::CellRegistry;
use crate::sector::SectorLayout;
use crate::systems::TickReport;
use rand_chacha::ChaCha8Rng;
use sylva_data::{LiveEvent, Season, Sector};

pub mod grid;
pub mod init;
pub mod logic;
pub mod update;

pub use grid::PlacementGrid;
pub use init::Organism;

pub struct World {
    pub width: u32,
    pub height: u32,
    pub tick: u64,
    pub season: Season,
    pub layout: SectorLayout,
    /// Column-major, see [`SectorLayout`].
    pub sectors: Vec<Sector>,
    pub grid: PlacementGrid,
    pub cells: CellRegistry,
    pub energy: EnergyManager,
    pub config: AppConfig,
    pub metrics: Metrics,
    pub rng: ChaCha8Rng,
    /// Events raised outside a tick (seeding, manual wiring); drained by the next update.
    pub pending_events: Vec<LiveEvent>,
    /// Bookkeeping from the most recent tick's cell phases.
    pub last_report: TickReport,
}

impl World {
    /// Current position in the four-step season cycle.
    #[must_use]
    pub fn season_cycle(&self) -> u8 {
        self.season.index()
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn sector_at(&self, position: sylva_data::Position) -> Option<&Sector> {
        self.layout
            .index_of(position)
            .and_then(|idx| self.sectors.get(idx))
    }

    /// Sum of the energy held by every live cell.
    #[must_use]
    pub fn total_cell_energy(&self) -> f64 {
        self.cells.snapshot().iter().map(|(_, c)| c.energy).sum()
    }
}
