use super::cell::{CellId, CellType};
use super::environment::WeatherEvent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a cell left the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    /// A required connection was missing when the cell tried to act.
    Disconnected,
    /// Energy ran out.
    Exhausted,
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeathCause::Disconnected => f.write_str("disconnected"),
            DeathCause::Exhausted => f.write_str("exhausted"),
        }
    }
}

/// Tagged union of the events emitted during a tick.
///
/// Serialised with `#[serde(tag = "event")]` for JSONL streaming.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event")]
pub enum LiveEvent {
    /// A cell was placed, either by world seeding or by a brain.
    Birth {
        id: CellId,
        parent_id: Option<CellId>,
        cell_type: CellType,
        tick: u64,
        timestamp: String,
        x: i32,
        y: i32,
    },
    /// A cell died and was removed from the network.
    Death {
        id: CellId,
        cell_type: CellType,
        cause: DeathCause,
        tick: u64,
        timestamp: String,
        x: i32,
        y: i32,
    },
    /// A dormant seed lost its anchor and became a brain.
    Activation {
        id: CellId,
        tick: u64,
        timestamp: String,
    },
    /// A weather event struck a sector.
    Weather {
        sector: usize,
        kind: WeatherEvent,
        tick: u64,
        timestamp: String,
    },
}
