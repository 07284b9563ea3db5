//! The lattice Boltzmann core
//!
//! All flow physics lives here. This module must be pure and deterministic:
//! - Fixed lattice, fixed time unit, no wall-clock input
//! - Stable sweep order (row-major, y outer, x inner)
//! - No rendering or platform dependencies
//!
//! One [`Solver`] owns one lattice. The host calls [`Solver::step`] once per
//! frame and reads the exported fields between steps.

pub mod d2q9;
pub mod fields;
pub mod geometry;
pub mod grid;
pub mod ramp;
pub mod solver;

pub use geometry::Geometry;
pub use grid::LatticeGrid;
pub use ramp::VelocityRamp;
pub use solver::Solver;
