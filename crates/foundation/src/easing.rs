//! Scalar easing curves over the unit interval.

/// Clamp into `[0, 1]`. NaN maps to 0 so a degenerate measurement never
/// poisons downstream styles.
#[inline]
pub fn clamp01(t: f64) -> f64 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

/// Cubic ease-in-out: `4t³` on the first half, `1 − (−2t+2)³/2` on the second.
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = clamp01(t);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_hits_endpoints_and_midpoint() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn cubic_is_monotonic() {
        let mut prev = 0.0;
        for i in 0..=1000 {
            let v = ease_in_out_cubic(i as f64 / 1000.0);
            assert!(v >= prev, "not monotonic at step {i}");
            prev = v;
        }
    }

    #[test]
    fn clamp01_handles_out_of_range_and_nan() {
        assert_eq!(clamp01(-3.0), 0.0);
        assert_eq!(clamp01(7.0), 1.0);
        assert_eq!(clamp01(f64::NAN), 0.0);
    }
}
