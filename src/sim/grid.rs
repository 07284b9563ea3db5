//! Lattice state storage
//!
//! Dense, fixed-size arrays for one solver instance: the live and scratch
//! distribution buffers, per-cell macroscopic fields, and the obstacle mask.
//! Cells are row-major (`y * width + x`); a cell's 9 distributions are
//! contiguous at `cell_index * Q`. Behavior beyond storage, indexing and the
//! buffer-role swap lives in [`super::solver`].

use super::d2q9::Q;

/// All per-cell state of a `width x height` lattice
#[derive(Debug, Clone)]
pub struct LatticeGrid {
    width: usize,
    height: usize,
    /// Live distributions, `width * height * Q` values
    pub f: Vec<f64>,
    /// Scratch distributions for double-buffered streaming, same size
    pub f_scratch: Vec<f64>,
    /// Density per cell, recovered during collision
    pub rho: Vec<f64>,
    /// x-velocity per cell, recovered during collision
    pub ux: Vec<f64>,
    /// y-velocity per cell, recovered during collision
    pub uy: Vec<f64>,
    /// Solid-cell mask; true cells bounce back instead of streaming
    pub obstacle: Vec<bool>,
}

impl LatticeGrid {
    /// Allocate a lattice. Dimensions are fixed for the instance's lifetime.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0, "width must be > 0");
        assert!(height > 0, "height must be > 0");
        let cells = width * height;
        Self {
            width,
            height,
            f: vec![0.0; cells * Q],
            f_scratch: vec![0.0; cells * Q],
            rho: vec![1.0; cells],
            ux: vec![0.0; cells],
            uy: vec![0.0; cells],
            obstacle: vec![false; cells],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> usize {
        self.width * self.height
    }

    /// Flat cell index for (x, y)
    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    /// The 9 distributions of cell (x, y)
    #[inline]
    pub fn dist(&self, x: usize, y: usize) -> &[f64] {
        let base = self.idx(x, y) * Q;
        &self.f[base..base + Q]
    }

    /// Mutable view of the 9 distributions of cell (x, y)
    #[inline]
    pub fn dist_mut(&mut self, x: usize, y: usize) -> &mut [f64] {
        let base = self.idx(x, y) * Q;
        &mut self.f[base..base + Q]
    }

    /// Exchange the live and scratch distribution buffers (no copy)
    pub fn swap_distributions(&mut self) {
        std::mem::swap(&mut self.f, &mut self.f_scratch);
    }
}
