//! Error types for structural misuse of the cell network.
//!
//! Degenerate simulation states (a disconnected cell, an exhausted brain) are
//! not errors: they are death transitions. These variants cover callers
//! wiring the network in a way that would break its invariants.

use sylva_data::{CellId, CellType, Position};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// The id does not resolve to a live cell.
    #[error("Unknown cell: {0}")]
    UnknownCell(CellId),

    /// The cell exists but is the wrong variant for the operation.
    #[error("Cell {id} is a {found}, expected a {expected}")]
    WrongCellType {
        id: CellId,
        expected: CellType,
        found: CellType,
    },

    /// The conduit already forwards to the other kind of target.
    #[error("Conduit {id} is already bound to {existing}")]
    ConduitAlreadyBound { id: CellId, existing: CellId },

    /// Linking would close a loop in the conduit chain.
    #[error("Linking conduit {from} to {to} would create a cycle")]
    Cycle { from: CellId, to: CellId },

    #[error("Position {0} is outside the world")]
    OutOfBounds(Position),

    #[error("Position {0} is already occupied")]
    Occupied(Position),
}

/// Result type alias for network wiring operations.
pub type Result<T> = std::result::Result<T, NetworkError>;

impl NetworkError {
    #[must_use]
    pub fn wrong_type(id: CellId, expected: CellType, found: CellType) -> Self {
        Self::WrongCellType {
            id,
            expected,
            found,
        }
    }
}
