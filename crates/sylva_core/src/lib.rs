//! # Sylva Core
//!
//! The simulation engine for Sylva, a plant-like organism growing through an
//! energy-routing cell network inside a seasonal, sector-partitioned world.
//!
//! This crate contains the deterministic simulation logic, including:
//! - Cell behavior (leaf, root, antenna, conduit, brain, seed)
//! - Network wiring with enforced single-successor conduit chains
//! - Energy allocation from sector resources
//! - Sector, world and environment tick model (seasons, weather, toxicity)
//! - Metrics collection and structured logging
//!
//! ## Architecture
//!
//! - **Registry-owned cells**: cells live in a `hecs` world and refer to each
//!   other by `CellId`; a despawned cell simply stops resolving
//! - **Phased ticks**: producers, then conduits upstream-first, then brains,
//!   then seeds
//! - **Deterministic simulation**: seeded RNG for reproducible results
//!
//! ## Example
//!
//! ```
//! use sylva_core::config::AppConfig;
//! use sylva_core::environment::Environment;
//! use sylva_core::world::World;
//! use sylva_data::Position;
//!
//! let mut config = AppConfig::default();
//! config.world.seed = Some(42);
//! let mut world = World::new(0, config.clone()).unwrap();
//! let mut env = Environment::with_seed(&config.environment, 42);
//!
//! let organism = world.seed_organism(Position::new(100, 100)).unwrap();
//! let events = world.update(&mut env).unwrap();
//! assert!(!events.is_empty());
//! assert!(world.cells.contains(organism.brain));
//! ```

/// Cell constructors and per-variant behavior
pub mod cell;
/// Configuration management for simulation parameters
pub mod config;
/// Energy sources and per-tick allocation
pub mod energy;
/// Weather policy and ecological niches
pub mod environment;
/// Errors raised by network wiring and placement
pub mod error;
/// Performance metrics collection and logging
pub mod metrics;
/// Conduit wiring and propagation order
pub mod network;
/// ECS-backed storage of live cells
pub mod registry;
/// Sector state transitions and layout
pub mod sector;
/// Per-tick cell phases
pub mod systems;
/// World state, seeding and tick driver
pub mod world;

pub use cell::{CellLogic, Release};
pub use energy::{EnergyManager, EnergySource};
pub use environment::{EcologicalNiche, Environment};
pub use error::NetworkError;
pub use metrics::{init_logging, Metrics};
pub use sector::{SectorLayout, SectorLogic};
pub use systems::TickReport;
pub use world::World;
