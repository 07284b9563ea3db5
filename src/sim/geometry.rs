//! Obstacle geometry presets
//!
//! Each preset fills the obstacle mask for a body centered at a quarter of
//! the channel length, half the channel height, sized relative to the
//! channel height so the wake has room to develop downstream.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// The obstacle placed in the channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Geometry {
    #[default]
    Circle,
    Airfoil,
    Square,
    FlatPlate,
    Triangle,
    /// Empty channel; also the fallback for unrecognized names
    Open,
}

impl Geometry {
    /// Every selectable variant, in display order
    pub const ALL: [Geometry; 6] = [
        Geometry::Circle,
        Geometry::Airfoil,
        Geometry::Square,
        Geometry::FlatPlate,
        Geometry::Triangle,
        Geometry::Open,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Geometry::Circle => "circle",
            Geometry::Airfoil => "airfoil",
            Geometry::Square => "square",
            Geometry::FlatPlate => "flat_plate",
            Geometry::Triangle => "triangle",
            Geometry::Open => "open",
        }
    }

    /// Parse a geometry name. Unrecognized names select the empty channel
    /// (with a warning) rather than failing, so a stale or misspelled name
    /// from the host degrades to plain channel flow.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "circle" => Geometry::Circle,
            "airfoil" => Geometry::Airfoil,
            "square" => Geometry::Square,
            "flat_plate" => Geometry::FlatPlate,
            "triangle" => Geometry::Triangle,
            "open" | "none" => Geometry::Open,
            other => {
                log::warn!("unknown geometry '{other}', leaving the channel open");
                Geometry::Open
            }
        }
    }

    /// Fill `mask` (row-major, `width * height`) with this preset's body.
    /// Clears the mask first; building is deterministic for fixed inputs.
    pub fn fill_mask(&self, width: usize, height: usize, mask: &mut [bool]) {
        debug_assert_eq!(mask.len(), width * height);
        mask.fill(false);
        let center = DVec2::new(width as f64 * 0.25, height as f64 * 0.5);
        match self {
            Geometry::Circle => fill_circle(center, width, height, mask),
            Geometry::Airfoil => fill_airfoil(center, width, height, mask),
            Geometry::Square => fill_square(center, width, height, mask),
            Geometry::FlatPlate => fill_flat_plate(center, width, height, mask),
            Geometry::Triangle => fill_triangle(center, width, height, mask),
            Geometry::Open => {}
        }
    }
}

/// Visit every cell's offset from the body center, marking where `inside`
fn mark_cells(
    center: DVec2,
    width: usize,
    height: usize,
    mask: &mut [bool],
    inside: impl Fn(DVec2) -> bool,
) {
    for y in 0..height {
        for x in 0..width {
            let d = DVec2::new(x as f64, y as f64) - center;
            if inside(d) {
                mask[y * width + x] = true;
            }
        }
    }
}

fn fill_circle(center: DVec2, width: usize, height: usize, mask: &mut [bool]) {
    let radius = height as f64 * 0.16;
    let r_sq = radius * radius;
    mark_cells(center, width, height, mask, |d| d.length_squared() < r_sq);
}

fn fill_square(center: DVec2, width: usize, height: usize, mask: &mut [bool]) {
    let half = height as f64 * 0.15;
    mark_cells(center, width, height, mask, |d| {
        d.x.abs() < half && d.y.abs() < half
    });
}

fn fill_flat_plate(center: DVec2, width: usize, height: usize, mask: &mut [bool]) {
    let half_length = height as f64 * 0.25;
    let half_thickness = 2.5;
    mark_cells(center, width, height, mask, |d| {
        d.x.abs() < half_length && d.y.abs() < half_thickness
    });
}

/// Diamond profile: widest at the center, tapering to points up- and
/// downstream
fn fill_triangle(center: DVec2, width: usize, height: usize, mask: &mut [bool]) {
    let size = height as f64 * 0.125;
    mark_cells(center, width, height, mask, |d| {
        if d.x.abs() >= size {
            return false;
        }
        let half_width = if d.x < 0.0 {
            (size + d.x) * 0.8
        } else {
            (size - d.x) * 0.8
        };
        d.y.abs() < half_width
    });
}

/// NACA-4 thickness profile at a fixed 5 degree angle of attack
fn fill_airfoil(center: DVec2, width: usize, height: usize, mask: &mut [bool]) {
    let chord = height as f64 / 3.5;
    let thickness = 0.12;
    let angle = 5.0_f64.to_radians();
    // Rotating each offset by -angle puts x along the chord line
    let rotation = DVec2::from_angle(-angle);
    mark_cells(center, width, height, mask, |d| {
        let local = rotation.rotate(d);
        if local.x < 0.0 || local.x > chord {
            return false;
        }
        let x_c = local.x / chord;
        let yt = 5.0
            * thickness
            * chord
            * (0.2969 * x_c.sqrt() - 0.126 * x_c - 0.3516 * x_c * x_c
                + 0.2843 * x_c * x_c * x_c
                - 0.1015 * x_c * x_c * x_c * x_c);
        local.y.abs() <= yt
    });
}
