//! The solver class exported to JavaScript
//!
//! A thin `wasm-bindgen` wrapper keeping the original host-facing names:
//! camelCase methods on an `LBMSolver` class, field exports as flat
//! row-major typed arrays of `width * height` entries.

use wasm_bindgen::prelude::*;

use crate::sim::Solver;

/// A simulation instance exposed to JS.
#[wasm_bindgen]
pub struct LBMSolver {
    inner: Solver,
}

#[wasm_bindgen]
impl LBMSolver {
    /// Build a solver for a fixed lattice. Throws (panics) on a zero
    /// dimension.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> LBMSolver {
        LBMSolver {
            inner: Solver::new(width as usize, height as usize),
        }
    }

    /// Set kinematic viscosity; the relaxation rate follows. No reset.
    #[wasm_bindgen(js_name = setViscosity)]
    pub fn set_viscosity(&mut self, nu: f64) {
        self.inner.set_viscosity(nu);
    }

    /// Set the target inlet speed. Values beyond roughly 0.3 lattice units
    /// will diverge; not validated.
    #[wasm_bindgen(js_name = setVelocity)]
    pub fn set_velocity(&mut self, u0: f64) {
        self.inner.set_velocity(u0);
    }

    /// Select the obstacle by name and reset. Unrecognized names leave the
    /// channel open.
    #[wasm_bindgen(js_name = setGeometry)]
    pub fn set_geometry(&mut self, name: &str) {
        self.inner.set_geometry_name(name);
    }

    /// Rebuild the obstacle and return the flow to rest.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Advance one time unit.
    pub fn step(&mut self) {
        self.inner.step();
    }

    #[wasm_bindgen(js_name = getWidth)]
    pub fn width(&self) -> u32 {
        self.inner.width() as u32
    }

    #[wasm_bindgen(js_name = getHeight)]
    pub fn height(&self) -> u32 {
        self.inner.height() as u32
    }

    /// Advisory pause flag; never gates `step()`.
    #[wasm_bindgen(js_name = setRunning)]
    pub fn set_running(&mut self, running: bool) {
        self.inner.set_running(running);
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.inner.is_running()
    }

    /// Flow speed per cell as a Float64Array, row-major.
    #[wasm_bindgen(js_name = getVelocityMagnitude)]
    pub fn velocity_magnitude(&self) -> Vec<f64> {
        self.inner.velocity_magnitude()
    }

    /// Velocity curl per cell as a Float64Array, row-major, zero border.
    #[wasm_bindgen(js_name = getVorticity)]
    pub fn vorticity(&self) -> Vec<f64> {
        self.inner.vorticity()
    }

    /// Pressure per cell as a Float64Array, row-major.
    #[wasm_bindgen(js_name = getPressure)]
    pub fn pressure(&self) -> Vec<f64> {
        self.inner.pressure()
    }

    /// Obstacle mask as a Uint8Array of 0/1, row-major.
    #[wasm_bindgen(js_name = getObstacle)]
    pub fn obstacle(&self) -> Vec<u8> {
        self.inner.obstacle().iter().map(|&solid| solid as u8).collect()
    }

    /// x-velocity per cell as a Float64Array, row-major.
    #[wasm_bindgen(js_name = getUx)]
    pub fn ux(&self) -> Vec<f64> {
        self.inner.ux().to_vec()
    }

    /// y-velocity per cell as a Float64Array, row-major.
    #[wasm_bindgen(js_name = getUy)]
    pub fn uy(&self) -> Vec<f64> {
        self.inner.uy().to_vec()
    }
}
