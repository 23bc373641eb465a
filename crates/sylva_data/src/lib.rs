//! Plain data types shared by the Sylva simulation crates.
//!
//! Nothing in here knows how to tick: behavior lives in `sylva_core`, which
//! extends these types through logic traits.

pub mod data;

pub use data::cell::{
    AntennaMode, Cell, CellId, CellInfo, CellKind, CellType, ConduitTarget, Identity, Position,
    Signals,
};
pub use data::environment::{Sector, Season, WeatherEvent};
pub use data::event::{DeathCause, LiveEvent};
pub use data::genome::Genome;
