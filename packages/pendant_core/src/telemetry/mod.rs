//! telemetry/mod.rs
//!
//! Synthetic pendant telemetry.
//!
//! # Sampling
//!
//! Every reading is drawn independently from an injected random source:
//!
//! ```text
//! heartRate     uniform [60, 99]
//! spo2          uniform [95, 100]
//! steps         uniform [1500, 1999]
//! temperature   uniform [36.0, 38.0), one decimal
//! batteryLevel  85 - uniform [0, 4]
//! wifi / ble    up with probability 0.9 each
//! acceleration  normal activity (p = 0.95) or impact (p = 0.05)
//! isFallen      svm(acceleration) > 2.5 g
//! ```
//!
//! The probabilities, bands and threshold live in [`TelemetryProfile`] so
//! callers can pin behaviour (for example `impact_probability = 1.0`).

pub mod fall;
pub mod history;

pub use fall::{is_fall, signal_vector_magnitude, FallDetector, FALL_THRESHOLD_G};
pub use history::{heart_rate_history, HISTORY_POINTS};

use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::types::{Acceleration, DeviceReading, DEVICE_ID};

pub const HEART_RATE_BPM: RangeInclusive<u32> = 60..=99;
pub const SPO2_PERCENT: RangeInclusive<u32> = 95..=100;
pub const STEPS: RangeInclusive<u32> = 1500..=1999;
pub const TEMPERATURE_MIN_C: f64 = 36.0;
pub const TEMPERATURE_MAX_C: f64 = 38.0;
pub const BATTERY_FULL_PERCENT: u32 = 85;
pub const BATTERY_MAX_DRAIN_PERCENT: u32 = 4;

/// Share of readings that simulate an impact.
pub const IMPACT_PROBABILITY: f64 = 0.05;
/// Chance that each radio link reports as connected.
pub const LINK_UP_PROBABILITY: f64 = 0.9;

/// Uniform band `center ± half_width` for one axis, in g.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisBand {
    pub center: f64,
    pub half_width: f64,
}

impl AxisBand {
    pub const fn new(center: f64, half_width: f64) -> Self {
        Self { center, half_width }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let half_width = self.half_width.abs();
        rng.gen_range(self.center - half_width..=self.center + half_width)
    }
}

/// Per-axis magnitude range for impacts. Each axis gets a random sign, so
/// every impact stays inside ±`max_g` on every axis. A plain uniform
/// ±2.0 g band is `ImpactBand::new(0.0, 2.0)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImpactBand {
    pub min_g: f64,
    pub max_g: f64,
}

impl ImpactBand {
    pub const fn new(min_g: f64, max_g: f64) -> Self {
        Self { min_g, max_g }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let (lo, hi) = if self.min_g <= self.max_g {
            (self.min_g, self.max_g)
        } else {
            (self.max_g, self.min_g)
        };
        let magnitude = rng.gen_range(lo..=hi);
        if rng.gen::<bool>() {
            magnitude
        } else {
            -magnitude
        }
    }
}

/// X and Z sit around zero, Y carries gravity.
pub const NORMAL_BANDS: [AxisBand; 3] = [
    AxisBand::new(0.0, 0.1),
    AxisBand::new(1.0, 0.1),
    AxisBand::new(0.0, 0.1),
];

/// Impact axes fall in 1.5..=2.0 g, so the smallest possible impact
/// magnitude (sqrt(3 * 1.5²) ≈ 2.6 g) clears the fall threshold.
pub const IMPACT_BAND: ImpactBand = ImpactBand::new(1.5, 2.0);

/// Which branch produced an acceleration sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activity {
    Normal,
    Impact,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TelemetryProfile {
    pub fall_threshold_g: f64,
    pub impact_probability: f64,
    pub link_up_probability: f64,
    pub normal_bands: [AxisBand; 3],
    pub impact_band: ImpactBand,
}

impl Default for TelemetryProfile {
    fn default() -> Self {
        Self {
            fall_threshold_g: FALL_THRESHOLD_G,
            impact_probability: IMPACT_PROBABILITY,
            link_up_probability: LINK_UP_PROBABILITY,
            normal_bands: NORMAL_BANDS,
            impact_band: IMPACT_BAND,
        }
    }
}

impl TelemetryProfile {
    pub fn with_fall_threshold(mut self, threshold_g: f64) -> Self {
        self.fall_threshold_g = threshold_g;
        self
    }

    pub fn with_impact_probability(mut self, probability: f64) -> Self {
        self.impact_probability = probability;
        self
    }

    pub fn with_link_up_probability(mut self, probability: f64) -> Self {
        self.link_up_probability = probability;
        self
    }

    /// Every sample is normal activity.
    pub fn normal_only() -> Self {
        Self::default().with_impact_probability(0.0)
    }

    /// Every sample is an impact.
    pub fn impact_only() -> Self {
        Self::default().with_impact_probability(1.0)
    }
}

/// `true` with probability `p`. Values outside [0, 1] saturate.
fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.gen::<f64>() < p
}

/// Builds readings from a profile and a caller-supplied random source.
#[derive(Clone, Debug, Default)]
pub struct TelemetryGenerator {
    profile: TelemetryProfile,
    detector: FallDetector,
}

impl TelemetryGenerator {
    pub fn new(profile: TelemetryProfile) -> Self {
        Self {
            detector: FallDetector::new(profile.fall_threshold_g),
            profile,
        }
    }

    pub fn profile(&self) -> &TelemetryProfile {
        &self.profile
    }

    pub fn detector(&self) -> &FallDetector {
        &self.detector
    }

    /// Draw one acceleration sample and report which branch produced it.
    pub fn sample_acceleration<R: Rng + ?Sized>(&self, rng: &mut R) -> (Acceleration, Activity) {
        if chance(rng, self.profile.impact_probability) {
            let band = self.profile.impact_band;
            let accel = Acceleration::new(band.sample(rng), band.sample(rng), band.sample(rng));
            log::debug!("Simulated impact sample: {:.3} g", accel.magnitude());
            (accel, Activity::Impact)
        } else {
            let [x, y, z] = self.profile.normal_bands;
            let accel = Acceleration::new(x.sample(rng), y.sample(rng), z.sample(rng));
            (accel, Activity::Normal)
        }
    }

    /// Synthesize a full reading stamped with `now`.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, now: DateTime<Utc>) -> DeviceReading {
        let (accel, _) = self.sample_acceleration(rng);
        self.generate_with_acceleration(rng, now, accel)
    }

    /// Synthesize the vitals and connectivity fields around a given
    /// acceleration. `is_fallen` is derived from `accel` exactly as stored.
    pub fn generate_with_acceleration<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        now: DateTime<Utc>,
        accel: Acceleration,
    ) -> DeviceReading {
        let heart_rate = rng.gen_range(HEART_RATE_BPM);
        let spo2 = rng.gen_range(SPO2_PERCENT);
        let steps = rng.gen_range(STEPS);
        let temperature = round_temperature(rng.gen_range(TEMPERATURE_MIN_C..TEMPERATURE_MAX_C));
        let battery_level = BATTERY_FULL_PERCENT - rng.gen_range(0..=BATTERY_MAX_DRAIN_PERCENT);
        let wifi_connected = chance(rng, self.profile.link_up_probability);
        let bluetooth_connected = chance(rng, self.profile.link_up_probability);
        let is_fallen = self.detector.is_fall(&accel);

        if is_fallen {
            log::debug!(
                "Fall flagged: svm {:.3} g > {:.2} g",
                accel.magnitude(),
                self.detector.threshold_g()
            );
        }

        DeviceReading {
            id: DEVICE_ID,
            heart_rate,
            spo2,
            steps,
            temperature,
            is_fallen,
            battery_level,
            wifi_connected,
            bluetooth_connected,
            accel_x: accel.x,
            accel_y: accel.y,
            accel_z: accel.z,
            timestamp: now,
        }
    }
}

/// One decimal, kept below the exclusive upper bound.
fn round_temperature(celsius: f64) -> f64 {
    let rounded = (celsius * 10.0).round() / 10.0;
    if rounded >= TEMPERATURE_MAX_C {
        (TEMPERATURE_MAX_C * 10.0 - 1.0) / 10.0
    } else {
        rounded
    }
}
