//! Derived visualization fields
//!
//! Free functions over the lattice state, computed fresh on every call.
//! All outputs are flat `width * height` arrays in the grid's row-major
//! order (outer loop over y, inner over x), so the host can reshape them
//! without a stride table.

use super::d2q9::CS2;
use super::grid::LatticeGrid;

/// Flow speed per cell, sqrt(ux^2 + uy^2)
pub fn velocity_magnitude(grid: &LatticeGrid) -> Vec<f64> {
    grid.ux
        .iter()
        .zip(&grid.uy)
        .map(|(ux, uy)| (ux * ux + uy * uy).sqrt())
        .collect()
}

/// z-component of the velocity curl, by central differences. The outermost
/// border is reported as zero; there is no one-sided fallback there.
pub fn vorticity(grid: &LatticeGrid) -> Vec<f64> {
    let (width, height) = (grid.width(), grid.height());
    let mut out = vec![0.0; grid.cells()];
    if width < 3 || height < 3 {
        return out;
    }
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let duy_dx = (grid.uy[grid.idx(x + 1, y)] - grid.uy[grid.idx(x - 1, y)]) / 2.0;
            let dux_dy = (grid.ux[grid.idx(x, y + 1)] - grid.ux[grid.idx(x, y - 1)]) / 2.0;
            out[grid.idx(x, y)] = duy_dx - dux_dy;
        }
    }
    out
}

/// Pressure per cell from the ideal-gas equation of state, rho * cs^2
pub fn pressure(grid: &LatticeGrid) -> Vec<f64> {
    grid.rho.iter().map(|rho| rho * CS2).collect()
}
