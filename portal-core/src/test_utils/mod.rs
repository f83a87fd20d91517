//! Test utilities shared by the unit tests
//!
//! Fixed clocks, seeded portals and a few assertions over portal errors.

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
