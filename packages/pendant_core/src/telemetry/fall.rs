//! telemetry/fall.rs
//!
//! Threshold-based fall detection over a single acceleration sample.
//!
//! Normal activity keeps the signal vector magnitude close to 1 g (gravity on
//! the vertical axis). A fall shows up as a short spike well above that, so a
//! sample is flagged when its magnitude is strictly greater than the threshold.

use crate::types::Acceleration;

/// Magnitude above which a sample counts as a fall, in g.
pub const FALL_THRESHOLD_G: f64 = 2.5;

/// Euclidean norm of the acceleration vector.
pub fn signal_vector_magnitude(accel: &Acceleration) -> f64 {
    accel.magnitude()
}

/// True when the magnitude is strictly above `threshold_g`.
pub fn is_fall(accel: &Acceleration, threshold_g: f64) -> bool {
    signal_vector_magnitude(accel) > threshold_g
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FallDetector {
    threshold_g: f64,
}

impl FallDetector {
    pub fn new(threshold_g: f64) -> Self {
        Self { threshold_g }
    }

    pub fn threshold_g(&self) -> f64 {
        self.threshold_g
    }

    pub fn is_fall(&self, accel: &Acceleration) -> bool {
        is_fall(accel, self.threshold_g)
    }
}

impl Default for FallDetector {
    fn default() -> Self {
        Self::new(FALL_THRESHOLD_G)
    }
}
