//! Sensor sample smoothing.
//!
//! Raw accelerometer and magnetometer streams are noisy enough to make the
//! rendered sky tremble. The exponentially weighted filter here damps small
//! jitter hard while letting genuine swings of the device through almost
//! unattenuated.

use stargaze_core::Vector3;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Per-axis exponentially weighted smoothing of 3-axis sensor samples.
///
/// Each new sample moves the smoothed value toward it by
/// `alpha * |diff|^(exponent-1) * diff`, clamped so the correction never
/// overshoots the sample itself. Higher exponents squash small differences
/// harder.
pub struct ExponentiallyWeightedSmoother {
    alpha: f64,
    exponent: u32,
    state: Mutex<Vector3>,
}

impl ExponentiallyWeightedSmoother {
    pub fn new(alpha: f64, exponent: u32) -> Self {
        log::debug!(
            "exponentially weighted smoother with alpha = {} and exponent = {}",
            alpha,
            exponent
        );
        Self {
            alpha,
            exponent,
            state: Mutex::new(Vector3::zeros()),
        }
    }

    fn current(&self) -> MutexGuard<'_, Vector3> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Feeds one sample through the filter and returns the smoothed value.
    pub fn smooth(&self, sample: Vector3) -> Vector3 {
        let mut current = self.current();
        for i in 0..3 {
            let last = current[i];
            let diff = sample[i] - last;
            let mut correction = diff * self.alpha;
            for _ in 1..self.exponent {
                correction *= diff.abs();
            }
            if correction.abs() > diff.abs() {
                correction = diff;
            }
            let smoothed = last + correction;
            match i {
                0 => current.x = smoothed,
                1 => current.y = smoothed,
                _ => current.z = smoothed,
            }
        }
        *current
    }

    /// Resets the filter to a known value, typically the first raw sample.
    pub fn reset(&self, value: Vector3) {
        *self.current() = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_one_exponent_one_passes_samples_through() {
        let smoother = ExponentiallyWeightedSmoother::new(1.0, 1);
        let sample = Vector3::new(1.0, -2.0, 3.0);
        assert_eq!(smoother.smooth(sample), sample);
    }

    #[test]
    fn converges_to_a_constant_input() {
        let smoother = ExponentiallyWeightedSmoother::new(0.7, 1);
        let target = Vector3::new(0.5, -0.25, 1.0);
        let mut value = Vector3::zeros();
        for _ in 0..50 {
            value = smoother.smooth(target);
        }
        assert!((value - target).magnitude() < 1e-6, "converged to {}", value);
    }

    #[test]
    fn higher_exponent_approaches_monotonically() {
        let smoother = ExponentiallyWeightedSmoother::new(0.7, 3);
        let target = Vector3::new(0.5, 0.0, 0.0);
        let mut previous = 0.0;
        for _ in 0..100 {
            let value = smoother.smooth(target).x;
            assert!(value >= previous && value <= target.x);
            previous = value;
        }
        assert!(previous > 0.3, "still at {} after 100 samples", previous);
    }

    #[test]
    fn damps_small_jitter_more_than_large_swings() {
        let smoother = ExponentiallyWeightedSmoother::new(0.7, 3);
        smoother.reset(Vector3::zeros());

        let after_small = smoother.smooth(Vector3::new(0.01, 0.0, 0.0));
        // 0.7 * 0.01^2 * 0.01 is essentially nothing.
        assert!(after_small.x < 0.001);

        smoother.reset(Vector3::zeros());
        let after_large = smoother.smooth(Vector3::new(2.0, 0.0, 0.0));
        // Correction clamps to the full difference for big swings.
        assert_eq!(after_large.x, 2.0);
    }

    #[test]
    fn correction_never_overshoots() {
        let smoother = ExponentiallyWeightedSmoother::new(0.9, 2);
        smoother.reset(Vector3::zeros());
        let out = smoother.smooth(Vector3::new(10.0, -10.0, 0.5));
        assert!(out.x <= 10.0 && out.y >= -10.0);
    }
}
