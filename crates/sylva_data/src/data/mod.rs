//! Core data structures for the Sylva simulation.

pub mod cell;
pub mod environment;
pub mod event;
pub mod genome;
