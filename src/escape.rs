// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time loop.  This is where nearly all of the render time
//! goes.

use num::Complex;

/// The square of the escape radius.  Once `|z|` exceeds 2 the orbit
/// is known to run off to infinity.
pub const ESCAPE_NORM_SQR: f64 = 4.0;

/// Iterate `z = z * z + c` from `z = 0`, at most `limit` times, and
/// return the step at which `z` was first seen outside the escape
/// radius.  The bound is tested *before* each step is applied, so the
/// earliest possible escape is at step 1: `z` starts at the origin.
/// A point that survives every step returns `limit` itself, which is
/// how callers recognize the interior of the set.
///
/// The arithmetic is spelled out on the real and imaginary parts
/// rather than going through `Complex`'s operators, which keeps the
/// squares around for the bound test.
#[inline]
pub fn escape_iterations(c: Complex<f64>, limit: usize) -> usize {
    let (mut x, mut y) = (0.0_f64, 0.0_f64);
    for i in 0..limit {
        let (xx, yy) = (x * x, y * y);
        if xx + yy > ESCAPE_NORM_SQR {
            return i;
        }
        y = 2.0 * x * y + c.im;
        x = xx - yy + c.re;
    }
    limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_never_escapes() {
        for &limit in &[1, 2, 48, 1000] {
            assert_eq!(escape_iterations(Complex::new(0.0, 0.0), limit), limit);
        }
    }

    #[test]
    fn three_escapes_after_one_step() {
        // z1 = 3, seen at the top of step 1.
        assert_eq!(escape_iterations(Complex::new(3.0, 0.0), 48), 1);
    }

    #[test]
    fn two_sits_on_the_boundary() {
        // z1 = 2 has |z|^2 == 4, which is not an escape; z2 = 6 is.
        assert_eq!(escape_iterations(Complex::new(2.0, 0.0), 48), 2);
    }

    #[test]
    fn limit_caps_slow_escapes() {
        assert_eq!(escape_iterations(Complex::new(3.0, 0.0), 1), 1);
        assert_eq!(escape_iterations(Complex::new(2.0, 0.0), 2), 2);
    }

    #[test]
    fn zero_limit_returns_zero() {
        assert_eq!(escape_iterations(Complex::new(3.0, 0.0), 0), 0);
    }

    #[test]
    fn matches_complex_arithmetic() {
        fn reference(c: Complex<f64>, limit: usize) -> usize {
            let mut z = Complex::new(0.0, 0.0);
            for i in 0..limit {
                if z.norm_sqr() > 4.0 {
                    return i;
                }
                z = z * z + c;
            }
            limit
        }
        for &(re, im) in &[(-0.75, 0.1), (0.3, 0.5), (-1.2, 0.35), (0.26, 0.0), (-2.0, 0.0)] {
            let c = Complex::new(re, im);
            assert_eq!(escape_iterations(c, 500), reference(c, 500));
        }
    }

    #[test]
    fn results_stay_within_budget() {
        let limit = 64;
        for ix in 0..40 {
            for iy in 0..40 {
                let c = Complex::new(-2.5 + ix as f64 * 0.1, -2.0 + iy as f64 * 0.1);
                let n = escape_iterations(c, limit);
                assert!(n <= limit);
            }
        }
    }

    #[test]
    fn main_cardioid_is_interior() {
        assert_eq!(escape_iterations(Complex::new(-0.5, 0.0), 2000), 2000);
        assert_eq!(escape_iterations(Complex::new(-1.0, 0.0), 2000), 2000);
    }
}
