//! Scalar field to color mapping
//!
//! Pure helpers the viewer uses to paint exported fields. Unsigned fields
//! (speed, pressure) go through min/max normalization and a scientific
//! blue-to-red ramp; signed fields (vorticity) through symmetric
//! normalization and a blue-white-red diverging ramp.

/// Map `values` to [0, 1] by its own min and max. A constant field maps to
/// all zeros rather than dividing by zero.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if !(range > 0.0) {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - min) / range).collect()
}

/// Map `values` to [0, 1] with zero fixed at 0.5, scaled by the largest
/// magnitude. Keeps the sign structure of fields like vorticity visible.
pub fn normalize_symmetric(values: &[f64]) -> Vec<f64> {
    let peak = values.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    if !(peak > 0.0) {
        return vec![0.5; values.len()];
    }
    values.iter().map(|v| 0.5 + v / (2.0 * peak)).collect()
}

/// Scientific ramp for t in [0, 1]: blue through cyan, green, and yellow to
/// red, in four linear segments of width 0.25.
pub fn sci(t: f64) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0).min(1.0 - 1e-4);
    let segment = (t / 0.25).floor();
    let s = (t - segment * 0.25) / 0.25;

    let (r, g, b) = match segment as u32 {
        0 => (0.0, s, 1.0),
        1 => (0.0, 1.0, 1.0 - s),
        2 => (s, 1.0, 0.0),
        _ => (1.0, 1.0 - s, 0.0),
    };
    [(255.0 * r) as u8, (255.0 * g) as u8, (255.0 * b) as u8]
}

/// Blue-white-red diverging ramp for signed data: t=0 blue, t=0.5 white,
/// t=1 red.
pub fn diverging(t: f64) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        let s = t * 2.0;
        [(s * 255.0) as u8, (s * 255.0) as u8, 255]
    } else {
        let s = (1.0 - t) * 2.0;
        [255, (s * 255.0) as u8, (s * 255.0) as u8]
    }
}
