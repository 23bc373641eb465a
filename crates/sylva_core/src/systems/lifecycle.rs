//! One tick of cell behavior.
//!
//! Phases run in a fixed order so that energy produced this tick reaches the
//! brain this tick:
//!
//! 1. producers (leaf, root, antenna) generate into their conduit;
//! 2. conduits forward, upstream first;
//! 3. brains pay their movement cost and reproduce or die;
//! 4. seeds check their anchor and activate or idle.
//!
//! Within a phase cells are visited in id order. Cells born during the tick
//! first act on the next one. A cell whose required link is missing dies
//! before it does anything else.

use crate::cell::{new_cell, CellLogic, Release};
use crate::config::AppConfig;
use crate::network;
use crate::registry::CellRegistry;
use crate::sector::SectorLayout;
use crate::world::grid::PlacementGrid;
use rand::Rng;
use sylva_data::{
    Cell, CellId, CellKind, CellType, ConduitTarget, DeathCause, Genome, Identity, LiveEvent,
    Sector, Signals,
};

/// Read-only state the cell phases need.
pub struct CellPhaseContext<'a> {
    pub config: &'a AppConfig,
    pub sectors: &'a [Sector],
    pub layout: &'a SectorLayout,
    pub tick: u64,
}

/// Energy and population bookkeeping for one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Generated by producers and credited to conduits.
    pub produced: f64,
    /// Moved from one conduit to the next or into a brain.
    pub forwarded: f64,
    /// The part of `forwarded` that landed in a brain.
    pub delivered: f64,
    /// Burned by brain movement and seed trickle.
    pub consumed: f64,
    /// Held by cells at the moment they died.
    pub lost_on_death: f64,
    /// Given to newborn cells.
    pub offspring_energy: f64,
    pub births: usize,
    pub deaths: usize,
    pub activations: usize,
}

#[derive(Debug, Default)]
pub struct PhaseOutcome {
    pub report: TickReport,
    pub releases: Vec<Release>,
    pub events: Vec<LiveEvent>,
}

pub(crate) fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

pub(crate) struct Phases<'a, 'w, R: Rng> {
    pub ctx: &'a CellPhaseContext<'w>,
    pub cells: &'a mut CellRegistry,
    pub grid: &'a mut PlacementGrid,
    pub rng: &'a mut R,
    pub outcome: PhaseOutcome,
}

impl<'a, 'w, R: Rng> Phases<'a, 'w, R> {
    pub fn new(
        ctx: &'a CellPhaseContext<'w>,
        cells: &'a mut CellRegistry,
        grid: &'a mut PlacementGrid,
        rng: &'a mut R,
    ) -> Self {
        Self {
            ctx,
            cells,
            grid,
            rng,
            outcome: PhaseOutcome::default(),
        }
    }

    fn resolves_to(&self, id: CellId, expected: CellType) -> bool {
        self.cells.cell_type(id) == Some(expected)
    }

    /// Death transition: the cell leaves the registry and its release is queued.
    pub fn kill(&mut self, id: CellId, cause: DeathCause) {
        let Some(mut cell) = self.cells.despawn(id) else {
            return;
        };
        let held = cell.energy;
        let release = cell.on_death(&self.ctx.config.environment);
        self.grid.vacate(cell.position, id);

        tracing::debug!(
            id = %id,
            cell_type = %cell.cell_type(),
            cause = %cause,
            x = cell.position.x,
            y = cell.position.y,
            "Cell died"
        );

        let report = &mut self.outcome.report;
        report.deaths += 1;
        report.lost_on_death += held;
        self.outcome.releases.push(release);
        self.outcome.events.push(LiveEvent::Death {
            id,
            cell_type: cell.cell_type(),
            cause,
            tick: self.ctx.tick,
            timestamp: timestamp(),
            x: cell.position.x,
            y: cell.position.y,
        });
    }

    /// Runs the behavior of a single cell, whatever its variant.
    pub fn perform_action(&mut self, id: CellId) -> anyhow::Result<()> {
        match self.cells.cell_type(id) {
            Some(CellType::Leaf | CellType::Root | CellType::Antenna) => self.act_producer(id),
            Some(CellType::Conduit) => self.act_conduit(id),
            Some(CellType::Brain) => self.act_brain(id)?,
            Some(CellType::Seed) => self.act_seed(id),
            None => {}
        }
        Ok(())
    }

    fn act_producer(&mut self, id: CellId) {
        let Some((conduit, generated)) = self.cells.get(id).map(|cell| {
            let sector = self
                .ctx
                .layout
                .index_of(cell.position)
                .and_then(|idx| self.ctx.sectors.get(idx));
            let generated = sector.map_or(0.0, |s| {
                cell.generate_energy(s, &self.ctx.config.cells, &self.ctx.config.environment)
            });
            (cell.kind.producer_conduit(), generated)
        }) else {
            return;
        };

        let Some(conduit) = conduit.filter(|&c| self.resolves_to(c, CellType::Conduit)) else {
            self.kill(id, DeathCause::Disconnected);
            return;
        };

        if generated > 0.0 {
            if let Some(target) = self.cells.get_mut(conduit) {
                target.add_energy(generated);
                self.outcome.report.produced += generated;
            }
        }
    }

    fn act_conduit(&mut self, id: CellId) {
        let Some((target, held)) = self.cells.get(id).and_then(|cell| match &cell.kind {
            CellKind::Conduit { target } => Some((*target, cell.energy)),
            _ => None,
        }) else {
            return;
        };

        let target = target.filter(|t| match t {
            ConduitTarget::Brain(b) => self.resolves_to(*b, CellType::Brain),
            ConduitTarget::Next(n) => self.resolves_to(*n, CellType::Conduit),
        });
        let Some(target) = target else {
            self.kill(id, DeathCause::Disconnected);
            return;
        };

        let amount = held.min(self.ctx.config.cells.conduit_throughput);
        let taken = self
            .cells
            .get_mut(id)
            .map_or(0.0, |cell| cell.consume_energy(amount));

        let signals = Signals::new();
        if let Some(receiver) = self.cells.get_mut(target.id()) {
            receiver.add_energy(taken);
            receiver.receive_signals(&signals);
        }

        let report = &mut self.outcome.report;
        report.forwarded += taken;
        if matches!(target, ConduitTarget::Brain(_)) {
            report.delivered += taken;
        }
    }

    fn act_brain(&mut self, id: CellId) -> anyhow::Result<()> {
        let cost = self.ctx.config.cells.brain_movement_cost;
        let Some((taken, remaining, position, genome)) = self.cells.get_mut(id).map(|cell| {
            let taken = cell.consume_energy(cost);
            (taken, cell.energy, cell.position, cell.genome.clone())
        }) else {
            return Ok(());
        };
        self.outcome.report.consumed += taken;

        if remaining <= 0.0 {
            self.kill(id, DeathCause::Exhausted);
            return Ok(());
        }

        let slot = position.behind();
        if !self.grid.is_free(slot) {
            tracing::trace!(id = %id, x = slot.x, y = slot.y, "No room behind brain");
            return Ok(());
        }

        let offspring_type = determine_cell_type(&genome, self.ctx.config);
        let energy = self.ctx.config.cells.offspring_energy;
        let kind = match offspring_type {
            CellType::Seed => {
                let Some(anchor) = network::feeding_conduit(self.cells, id) else {
                    tracing::trace!(id = %id, "Brain has no conduit to anchor a seed");
                    return Ok(());
                };
                CellKind::Seed { anchor }
            }
            _ => CellKind::Leaf { conduit: None },
        };
        let inherited = if offspring_type == CellType::Seed {
            genome
        } else {
            Genome::default()
        };

        let mut offspring = new_cell(kind, slot, energy, inherited, self.ctx.tick);
        if offspring.cell_type() == CellType::Seed {
            offspring.mutate_with_rng(self.ctx.config.evolution.mutation_rate, self.rng);
        }
        self.spawn_child(id, offspring)?;
        Ok(())
    }

    fn spawn_child(&mut self, parent: CellId, cell: Cell) -> anyhow::Result<CellId> {
        let child = CellId::from_u128(self.rng.gen());
        let position = cell.position;
        let cell_type = cell.cell_type();
        let energy = cell.energy;
        self.grid.place(position, child)?;
        self.cells.spawn(
            Identity {
                id: child,
                parent_id: Some(parent),
            },
            cell,
        );

        tracing::debug!(
            id = %child,
            parent = %parent,
            cell_type = %cell_type,
            x = position.x,
            y = position.y,
            "Cell born"
        );
        let report = &mut self.outcome.report;
        report.births += 1;
        report.offspring_energy += energy;
        self.outcome.events.push(LiveEvent::Birth {
            id: child,
            parent_id: Some(parent),
            cell_type,
            tick: self.ctx.tick,
            timestamp: timestamp(),
            x: position.x,
            y: position.y,
        });
        Ok(child)
    }

    fn act_seed(&mut self, id: CellId) {
        let Some(anchor) = self.cells.get(id).and_then(|cell| match cell.kind {
            CellKind::Seed { anchor } => Some(anchor),
            _ => None,
        }) else {
            return;
        };

        if !self.cells.contains(anchor) {
            // No trickle on the activation tick: the brain starts with the
            // seed's energy unchanged.
            if let Some(cell) = self.cells.get_mut(id) {
                *cell = cell.clone().into_brain();
            }
            tracing::debug!(id = %id, anchor = %anchor, "Seed activated into brain");
            self.outcome.report.activations += 1;
            self.outcome.events.push(LiveEvent::Activation {
                id,
                tick: self.ctx.tick,
                timestamp: timestamp(),
            });
            return;
        }

        let trickle = self.ctx.config.cells.seed_trickle;
        let Some((taken, remaining)) = self
            .cells
            .get_mut(id)
            .map(|cell| (cell.consume_energy(trickle), cell.energy))
        else {
            return;
        };
        self.outcome.report.consumed += taken;
        if remaining <= 0.0 {
            self.kill(id, DeathCause::Exhausted);
        }
    }

    pub fn finish(self) -> PhaseOutcome {
        self.outcome
    }
}

/// Offspring type chosen from the parent genome.
///
/// The genome is not interpreted yet: the configured type is always used.
pub fn determine_cell_type(_genome: &Genome, config: &AppConfig) -> CellType {
    config.cells.offspring_type
}

/// Runs every live cell once, in phase order.
pub fn run_cell_phases<R: Rng>(
    ctx: &CellPhaseContext<'_>,
    cells: &mut CellRegistry,
    grid: &mut PlacementGrid,
    rng: &mut R,
) -> anyhow::Result<PhaseOutcome> {
    let ids = cells.ids();
    let of_type = |cells: &CellRegistry, wanted: &[CellType]| -> Vec<CellId> {
        ids.iter()
            .copied()
            .filter(|&id| cells.cell_type(id).is_some_and(|t| wanted.contains(&t)))
            .collect()
    };

    let producers = of_type(cells, &[CellType::Leaf, CellType::Root, CellType::Antenna]);
    let brains = of_type(cells, &[CellType::Brain]);
    let seeds = of_type(cells, &[CellType::Seed]);

    let mut phases = Phases::new(ctx, cells, grid, rng);

    for id in producers {
        phases.act_producer(id);
    }

    for id in network::propagation_order(phases.cells)? {
        phases.act_conduit(id);
    }

    for id in brains {
        phases.act_brain(id)?;
    }

    for id in seeds {
        phases.act_seed(id);
    }

    Ok(phases.finish())
}
