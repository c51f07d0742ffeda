//! Angle helpers shared by the estimator and the zone queries

use std::f64::consts::{PI, TAU};

/// Wrap a heading into `[0, 2π)`
pub fn normalize_heading(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Shortest signed rotation taking `from` to `to`, in `(-π, π]`
pub fn heading_delta(from: f64, to: f64) -> f64 {
    let delta = (to - from).rem_euclid(TAU);
    if delta > PI {
        delta - TAU
    } else {
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn wraps_across_zero() {
        let delta = heading_delta(359f64.to_radians(), 1f64.to_radians());
        assert_abs_diff_eq!(delta, 2f64.to_radians(), epsilon = 1e-12);

        let delta = heading_delta(1f64.to_radians(), 359f64.to_radians());
        assert_abs_diff_eq!(delta, -2f64.to_radians(), epsilon = 1e-12);
    }

    #[test]
    fn half_turn_is_positive_pi() {
        assert_abs_diff_eq!(heading_delta(0.0, PI), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(heading_delta(PI, 0.0), PI, epsilon = 1e-12);
    }

    #[test]
    fn delta_stays_in_range_for_sweep() {
        let mut a = -7.0;
        while a < 7.0 {
            let mut b = -7.0;
            while b < 7.0 {
                let d = heading_delta(a, b);
                assert!(d > -PI && d <= PI, "delta {d} out of range for {a} -> {b}");
                let reconstructed = normalize_heading(a + d);
                let target = normalize_heading(b);
                let err = heading_delta(reconstructed, target).abs();
                assert!(err < 1e-9);
                b += 0.37;
            }
            a += 0.41;
        }
    }

    #[test]
    fn normalize_lands_in_range() {
        assert_abs_diff_eq!(normalize_heading(-PI / 2.0), 1.5 * PI, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_heading(5.0 * PI), PI, epsilon = 1e-12);
        assert_eq!(normalize_heading(-1e-18), 0.0);
    }
}
