//! Tick systems that act on the cell network.

pub mod lifecycle;

pub use lifecycle::{run_cell_phases, CellPhaseContext, PhaseOutcome, TickReport};
