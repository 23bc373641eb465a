use crate::cell::{new_antenna, new_brain, new_cell};
use crate::config::AppConfig;
use crate::energy::EnergyManager;
use crate::error::NetworkError;
use crate::metrics::Metrics;
use crate::network;
use crate::registry::CellRegistry;
use crate::sector::{SectorLayout, SectorLogic};
use crate::systems::lifecycle::timestamp;
use crate::world::{PlacementGrid, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sylva_data::{Cell, CellId, CellKind, Genome, Identity, LiveEvent, Position, Season};

const PLACEMENT_ATTEMPTS: usize = 64;

/// Ids of a founder organism, as laid out by [`World::seed_organism`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Organism {
    pub brain: CellId,
    /// `[inner, outer]`: the inner conduit feeds the brain, the outer one feeds the inner.
    pub conduits: [CellId; 2],
    pub leaf: CellId,
    pub root: CellId,
    pub antenna: CellId,
    pub seed: CellId,
}

impl Organism {
    #[must_use]
    pub fn ids(&self) -> [CellId; 7] {
        [
            self.brain,
            self.conduits[0],
            self.conduits[1],
            self.leaf,
            self.root,
            self.antenna,
            self.seed,
        ]
    }
}

/// Founder layout relative to the brain at `(x, y)`:
///
/// ```text
///   y+3        root
///   y+2  leaf  outer
///   y+1  seed  inner  antenna
///   y          brain
///       x-1    x      x+1
/// ```
fn founder_positions(origin: Position) -> [Position; 7] {
    let Position { x, y } = origin;
    [
        origin,
        Position::new(x, y + 1),
        Position::new(x, y + 2),
        Position::new(x - 1, y + 2),
        Position::new(x, y + 3),
        Position::new(x + 1, y + 1),
        Position::new(x - 1, y + 1),
    ]
}

impl World {
    /// Builds a world and seeds `initial_organisms` founders at random free
    /// positions. The RNG is seeded from `config.world.seed` when present.
    pub fn new(initial_organisms: usize, config: AppConfig) -> anyhow::Result<Self> {
        let rng = if let Some(seed) = config.world.seed {
            ChaCha8Rng::seed_from_u64(seed)
        } else {
            ChaCha8Rng::from_entropy()
        };
        Self::with_rng(initial_organisms, config, rng)
    }

    pub fn with_rng(
        initial_organisms: usize,
        config: AppConfig,
        rng: ChaCha8Rng,
    ) -> anyhow::Result<Self> {
        config.validate()?;
        let layout = SectorLayout::new(
            config.world.width,
            config.world.height,
            config.world.sectors_per_axis,
        )?;

        let season = Season::default();
        let mut sectors = layout.build_sectors();
        for sector in &mut sectors {
            sector.update_season(season);
            sector.update_sunlight();
        }

        let mut world = Self {
            width: config.world.width,
            height: config.world.height,
            tick: 0,
            season,
            layout,
            sectors,
            grid: PlacementGrid::new(config.world.width, config.world.height),
            cells: CellRegistry::new(),
            energy: EnergyManager::new(config.energy.clone()),
            config,
            metrics: Metrics::new(),
            rng,
            pending_events: Vec::new(),
            last_report: Default::default(),
        };

        for n in 0..initial_organisms {
            if world.seed_random_organism().is_none() {
                tracing::warn!(
                    organism = n,
                    attempts = PLACEMENT_ATTEMPTS,
                    "No free position for founder organism"
                );
            }
        }

        tracing::info!(
            width = world.width,
            height = world.height,
            sectors = world.sectors.len(),
            cells = world.cells.len(),
            "World created"
        );
        Ok(world)
    }

    fn seed_random_organism(&mut self) -> Option<Organism> {
        if self.width < 3 || self.height < 4 {
            return None;
        }
        for _ in 0..PLACEMENT_ATTEMPTS {
            let origin = Position::new(
                self.rng.gen_range(1..self.width as i32 - 1),
                self.rng.gen_range(0..self.height as i32 - 3),
            );
            if let Ok(organism) = self.seed_organism(origin) {
                return Some(organism);
            }
        }
        None
    }

    /// Places a cell on the grid and registers it. Returns the new id.
    pub fn spawn_cell(&mut self, cell: Cell, parent: Option<CellId>) -> crate::error::Result<CellId> {
        let id = CellId::from_u128(self.rng.gen());
        let position = cell.position;
        let cell_type = cell.cell_type();
        self.grid.place(position, id)?;
        self.cells.spawn(Identity { id, parent_id: parent }, cell);
        self.pending_events.push(LiveEvent::Birth {
            id,
            parent_id: parent,
            cell_type,
            tick: self.tick,
            timestamp: timestamp(),
            x: position.x,
            y: position.y,
        });
        Ok(id)
    }

    /// Places a complete founder organism with its brain at `origin`.
    ///
    /// Every founder position must be in bounds and free; otherwise nothing
    /// is placed.
    pub fn seed_organism(&mut self, origin: Position) -> anyhow::Result<Organism> {
        let positions = founder_positions(origin);
        for &position in &positions {
            if !self.grid.in_bounds(position) {
                return Err(NetworkError::OutOfBounds(position).into());
            }
            if !self.grid.is_free(position) {
                return Err(NetworkError::Occupied(position).into());
            }
        }
        let [brain_at, inner_at, outer_at, leaf_at, root_at, antenna_at, seed_at] = positions;

        let energy = self.config.cells.founder_energy;
        let tick = self.tick;
        let brain_cell = new_brain(brain_at, energy, None, tick);
        let genome = brain_cell.genome.clone();
        let conduit = |at| new_cell(CellKind::Conduit { target: None }, at, energy, Genome::default(), tick);

        let brain = self.spawn_cell(brain_cell, None)?;
        let inner = self.spawn_cell(conduit(inner_at), None)?;
        let outer = self.spawn_cell(conduit(outer_at), None)?;
        let leaf = self.spawn_cell(
            new_cell(CellKind::Leaf { conduit: None }, leaf_at, energy, Genome::default(), tick),
            None,
        )?;
        let root = self.spawn_cell(
            new_cell(CellKind::Root { conduit: None }, root_at, energy, Genome::default(), tick),
            None,
        )?;
        let antenna_cell = new_antenna(antenna_at, energy, None, tick, &mut self.rng);
        let antenna = self.spawn_cell(antenna_cell, None)?;
        let seed = self.spawn_cell(
            new_cell(CellKind::Seed { anchor: outer }, seed_at, energy, genome, tick),
            Some(brain),
        )?;

        network::connect_to_brain(&mut self.cells, inner, brain)?;
        network::connect_to_next_conduit(&mut self.cells, outer, inner)?;
        network::connect_to_conduit(&mut self.cells, leaf, outer)?;
        network::connect_to_conduit(&mut self.cells, root, outer)?;
        network::gather_mode(&mut self.cells, antenna, inner)?;

        tracing::debug!(brain = %brain, x = origin.x, y = origin.y, "Founder organism seeded");
        Ok(Organism {
            brain,
            conduits: [inner, outer],
            leaf,
            root,
            antenna,
            seed,
        })
    }
}
