//! Snap floating point values to nearby simple rationals.
//!
//! Facet coefficients of polytopes with small integer data are ratios of
//! small integers; the LP hands them back with rounding noise. `round_to`
//! walks the continued fraction expansion and returns the first convergent
//! within tolerance, or the value unchanged when none has a small denominator.

/// Largest denominator accepted.
const MAX_DENOM: f64 = 1000.0;
/// Relative distance within which a convergent replaces the value.
const ROUND_EPS: f64 = 1e-9;
/// Continued fraction terms examined.
const MAX_TERMS: usize = 32;

/// Nearest rational `p/q` with `q <= 1000` within `1e-9` (relative), else `x`.
pub fn round_to(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let target = x.abs();
    let tol = ROUND_EPS * target.max(1.0);
    // Convergents p_k/q_k with p_{-1}=1, q_{-1}=0, p_{-2}=0, q_{-2}=1.
    let (mut p0, mut q0, mut p1, mut q1) = (0.0, 1.0, 1.0, 0.0);
    let mut frac = target;
    for _ in 0..MAX_TERMS {
        let a = frac.floor();
        let p = a * p1 + p0;
        let q = a * q1 + q0;
        if q > MAX_DENOM {
            break;
        }
        if (p / q - target).abs() <= tol {
            return x.signum() * (p / q);
        }
        let rem = frac - a;
        if rem <= f64::EPSILON {
            break;
        }
        frac = 1.0 / rem;
        (p0, q0, p1, q1) = (p1, q1, p, q);
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snaps_noisy_simple_fractions() {
        assert_eq!(round_to(0.333_333_333_333_4), 1.0 / 3.0);
        assert_eq!(round_to(-0.666_666_666_666_5), -2.0 / 3.0);
        assert_eq!(round_to(0.125_000_000_000_1), 0.125);
        assert_eq!(round_to(2.999_999_999_999), 3.0);
    }

    #[test]
    fn tiny_values_snap_to_zero() {
        assert_eq!(round_to(1e-13), 0.0);
        assert_eq!(round_to(-1e-13), 0.0);
    }

    #[test]
    fn leaves_other_values_alone() {
        let pi = std::f64::consts::PI;
        assert_eq!(round_to(pi), pi);
        let sqrt2 = std::f64::consts::SQRT_2;
        assert_eq!(round_to(sqrt2), sqrt2);
        assert!(round_to(f64::NAN).is_nan());
        assert_eq!(round_to(f64::INFINITY), f64::INFINITY);
    }
}
