//! D2Q9 lattice constants
//!
//! Nine discrete velocities per cell, indexed so that opposite directions
//! pair up for bounce-back. Offsets `(EX, EY)` with y increasing upward:
//!
//! ```text
//!   6  2  5
//!    \ | /
//!   3--0--1
//!    / | \
//!   7  4  8
//! ```

/// Number of discrete velocity directions per cell
pub const Q: usize = 9;

/// x-component of each direction's velocity offset
pub const EX: [i32; 9] = [0, 1, 0, -1, 0, 1, -1, -1, 1];

/// y-component of each direction's velocity offset
pub const EY: [i32; 9] = [0, 0, 1, 0, -1, 1, 1, -1, -1];

/// Lattice weights, summing to 1: rest 4/9, axes 1/9, diagonals 1/36
pub const W: [f64; 9] = [
    4.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
];

/// Index of the opposite direction, `EX[OPP[k]] == -EX[k]`
pub const OPP: [usize; 9] = [0, 3, 4, 1, 2, 7, 8, 5, 6];

/// Lattice speed of sound squared (pressure = density * CS2)
pub const CS2: f64 = 1.0 / 3.0;

/// Maxwell-Boltzmann equilibrium distribution, second-order expansion
///
/// For each direction k: `feq[k] = w[k]* rho * (1 + cu + cu^2/2 - u^2*3/2)`
/// with `cu = 3 * (ex[k]*ux + ey[k]*uy)`. This is the target the BGK
/// collision relaxes toward, and the state every cell is reset to.
#[inline]
pub fn equilibrium(rho: f64, ux: f64, uy: f64) -> [f64; 9] {
    let u_sq = 1.5 * (ux * ux + uy * uy);
    let mut feq = [0.0; 9];
    for k in 0..Q {
        let cu = 3.0 * (f64::from(EX[k]) * ux + f64::from(EY[k]) * uy);
        feq[k] = W[k] * rho * (1.0 + cu + 0.5 * cu * cu - u_sq);
    }
    feq
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_weights_sum_to_one() {
        let sum: f64 = W.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_opposite_pairs() {
        for k in 0..Q {
            assert_eq!(EX[OPP[k]], -EX[k], "direction {k}");
            assert_eq!(EY[OPP[k]], -EY[k], "direction {k}");
            assert_eq!(OPP[OPP[k]], k, "direction {k}");
        }
    }

    #[test]
    fn test_rest_equilibrium_equals_weights() {
        // At rho=1, u=0 every correction term vanishes, so feq is the
        // weight vector itself, bit for bit.
        let feq = equilibrium(1.0, 0.0, 0.0);
        for k in 0..Q {
            assert_eq!(feq[k], W[k], "direction {k}");
        }
    }

    proptest! {
        #[test]
        fn equilibrium_sums_to_density(
            rho in 0.1f64..3.0,
            ux in -0.3f64..0.3,
            uy in -0.3f64..0.3,
        ) {
            let feq = equilibrium(rho, ux, uy);
            let sum: f64 = feq.iter().sum();
            prop_assert!((sum - rho).abs() < 1e-12);
        }

        #[test]
        fn equilibrium_recovers_momentum(
            rho in 0.1f64..3.0,
            ux in -0.3f64..0.3,
            uy in -0.3f64..0.3,
        ) {
            let feq = equilibrium(rho, ux, uy);
            let mx: f64 = (0..Q).map(|k| f64::from(EX[k]) * feq[k]).sum();
            let my: f64 = (0..Q).map(|k| f64::from(EY[k]) * feq[k]).sum();
            prop_assert!((mx - rho * ux).abs() < 1e-10);
            prop_assert!((my - rho * uy).abs() < 1e-10);
        }
    }
}
