//! Wind Tunnel - a 2D lattice Boltzmann flow simulator
//!
//! Core modules:
//! - `sim`: Deterministic D2Q9 solver (collision, streaming, boundaries)
//! - `colormap`: Scalar field to RGBA mapping for the viewer
//! - `settings`: Viewer preferences persisted in LocalStorage
//! - `wasm`: The `LBMSolver` class exported to JavaScript (wasm32 only)
//!
//! The solver itself is host-agnostic: it exposes numeric arrays and scalar
//! controls and leaves the frame loop, rendering, and input to whoever
//! drives it.

pub mod colormap;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use settings::{DisplayField, ViewerSettings};
pub use sim::{Geometry, Solver};

/// Solver and viewer defaults
pub mod consts {
    /// Kinematic viscosity at construction (tau = 0.56)
    pub const DEFAULT_VISCOSITY: f64 = 0.02;
    /// Target inlet speed at construction, in lattice units
    pub const DEFAULT_INLET_VELOCITY: f64 = 0.15;
    /// Steps for the inlet to ramp from rest to the target speed
    pub const RAMP_STEPS: u32 = 500;

    /// Inlet speeds beyond this are outside the lattice's stable range;
    /// the sliders stop here, the solver does not enforce it
    pub const MAX_INLET_VELOCITY: f64 = 0.3;

    /// Viewer lattice dimensions
    pub const GRID_WIDTH: usize = 320;
    pub const GRID_HEIGHT: usize = 160;
    /// Solver steps per rendered frame at the default setting
    pub const DEFAULT_STEPS_PER_FRAME: u32 = 5;
}
