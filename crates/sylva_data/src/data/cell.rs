use super::genome::Genome;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Stable identifier of a cell in the world registry.
///
/// Cells never own each other; every link in the network is a `CellId` that is
/// resolved through the registry, so a link to a removed cell simply resolves
/// to nothing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct CellId(pub Uuid);

impl CellId {
    #[must_use]
    pub fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Integer grid coordinate of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// One grid step towards negative y.
    #[must_use]
    pub fn behind(self) -> Self {
        Self {
            x: self.x,
            y: self.y - 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Identity component of a registered cell.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Identity {
    pub id: CellId,
    pub parent_id: Option<CellId>,
}

/// Discriminant of the cell variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CellType {
    #[default]
    Leaf,
    Root,
    Antenna,
    Conduit,
    Brain,
    Seed,
}

impl CellType {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            CellType::Leaf => "leaf",
            CellType::Root => "root",
            CellType::Antenna => "antenna",
            CellType::Conduit => "conduit",
            CellType::Brain => "brain",
            CellType::Seed => "seed",
        }
    }

    /// Leaf, Root and Antenna draw energy from their sector.
    #[must_use]
    pub fn is_producer(&self) -> bool {
        matches!(self, CellType::Leaf | CellType::Root | CellType::Antenna)
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operating mode of an antenna.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AntennaMode {
    #[default]
    Gather,
    Communicate,
}

/// Downstream target of a conduit. A conduit holds at most one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConduitTarget {
    Brain(CellId),
    Next(CellId),
}

impl ConduitTarget {
    #[must_use]
    pub fn id(&self) -> CellId {
        match self {
            ConduitTarget::Brain(id) | ConduitTarget::Next(id) => *id,
        }
    }
}

/// Signal payload relayed along a conduit chain.
pub type Signals = HashMap<String, f32>;

/// Variant-specific state of a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellKind {
    Leaf {
        conduit: Option<CellId>,
    },
    Root {
        conduit: Option<CellId>,
    },
    Antenna {
        conduit: Option<CellId>,
        mode: AntennaMode,
        radio_frequency: f32,
    },
    Conduit {
        target: Option<ConduitTarget>,
    },
    Brain {
        signals_processed: u64,
    },
    Seed {
        anchor: CellId,
    },
}

impl CellKind {
    #[must_use]
    pub fn cell_type(&self) -> CellType {
        match self {
            CellKind::Leaf { .. } => CellType::Leaf,
            CellKind::Root { .. } => CellType::Root,
            CellKind::Antenna { .. } => CellType::Antenna,
            CellKind::Conduit { .. } => CellType::Conduit,
            CellKind::Brain { .. } => CellType::Brain,
            CellKind::Seed { .. } => CellType::Seed,
        }
    }

    /// The conduit a producer feeds, if any.
    #[must_use]
    pub fn producer_conduit(&self) -> Option<CellId> {
        match self {
            CellKind::Leaf { conduit }
            | CellKind::Root { conduit }
            | CellKind::Antenna { conduit, .. } => *conduit,
            _ => None,
        }
    }
}

/// A single unit of the organism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub position: Position,
    /// Never negative.
    pub energy: f64,
    pub genome: Genome,
    pub kind: CellKind,
    pub alive: bool,
    pub birth_tick: u64,
}

impl Cell {
    #[must_use]
    pub fn cell_type(&self) -> CellType {
        self.kind.cell_type()
    }
}

/// Externally visible snapshot of a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellInfo {
    pub id: CellId,
    pub cell_type: CellType,
    pub position: Position,
    pub energy: f64,
    pub genome: Genome,
    /// Reported by seeds only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conduit_cell_alive: Option<bool>,
}
