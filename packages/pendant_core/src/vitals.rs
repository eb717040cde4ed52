//! vitals.rs
//!
//! Per-metric status for a reading, as shown on the caregiver dashboard.

use serde::Serialize;

use crate::types::DeviceReading;

pub const HEART_RATE_LOW_BPM: u32 = 50;
pub const HEART_RATE_HIGH_BPM: u32 = 100;
pub const SPO2_DANGER_BELOW: u32 = 95;
pub const TEMPERATURE_WARNING_ABOVE_C: f64 = 37.5;
pub const LOW_BATTERY_BELOW: u32 = 20;

/// Ordered from least to most severe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VitalStatus {
    Normal,
    Warning,
    Danger,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsAssessment {
    pub heart_rate: VitalStatus,
    pub spo2: VitalStatus,
    pub steps: VitalStatus,
    pub temperature: VitalStatus,
    pub low_battery: bool,
    pub fall_detected: bool,
}

impl VitalsAssessment {
    /// Worst status across the metrics. A detected fall is always danger.
    pub fn overall(&self) -> VitalStatus {
        if self.fall_detected {
            return VitalStatus::Danger;
        }
        [self.heart_rate, self.spo2, self.steps, self.temperature]
            .into_iter()
            .max()
            .unwrap_or(VitalStatus::Normal)
    }
}

pub fn heart_rate_status(bpm: u32) -> VitalStatus {
    if bpm > HEART_RATE_HIGH_BPM || bpm < HEART_RATE_LOW_BPM {
        VitalStatus::Warning
    } else {
        VitalStatus::Normal
    }
}

pub fn spo2_status(percent: u32) -> VitalStatus {
    if percent < SPO2_DANGER_BELOW {
        VitalStatus::Danger
    } else {
        VitalStatus::Normal
    }
}

pub fn temperature_status(celsius: f64) -> VitalStatus {
    if celsius > TEMPERATURE_WARNING_ABOVE_C {
        VitalStatus::Warning
    } else {
        VitalStatus::Normal
    }
}

pub fn assess(reading: &DeviceReading) -> VitalsAssessment {
    VitalsAssessment {
        heart_rate: heart_rate_status(reading.heart_rate),
        spo2: spo2_status(reading.spo2),
        steps: VitalStatus::Normal,
        temperature: temperature_status(reading.temperature),
        low_battery: reading.battery_level < LOW_BATTERY_BELOW,
        fall_detected: reading.is_fallen,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEVICE_ID;
    use chrono::Utc;

    fn reading() -> DeviceReading {
        DeviceReading {
            id: DEVICE_ID,
            heart_rate: 72,
            spo2: 98,
            steps: 1600,
            temperature: 36.6,
            is_fallen: false,
            battery_level: 84,
            wifi_connected: true,
            bluetooth_connected: true,
            accel_x: 0.0,
            accel_y: 1.0,
            accel_z: 0.0,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_calm_reading_is_normal() {
        let a = assess(&reading());
        assert_eq!(a.overall(), VitalStatus::Normal);
        assert!(!a.low_battery);
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(heart_rate_status(100), VitalStatus::Normal);
        assert_eq!(heart_rate_status(101), VitalStatus::Warning);
        assert_eq!(heart_rate_status(49), VitalStatus::Warning);
        assert_eq!(spo2_status(95), VitalStatus::Normal);
        assert_eq!(spo2_status(94), VitalStatus::Danger);
        assert_eq!(temperature_status(37.5), VitalStatus::Normal);
        assert_eq!(temperature_status(37.6), VitalStatus::Warning);
    }

    #[test]
    fn test_fall_overrides_everything() {
        let mut r = reading();
        r.is_fallen = true;
        assert_eq!(assess(&r).overall(), VitalStatus::Danger);
    }

    #[test]
    fn test_worst_metric_wins() {
        let mut r = reading();
        r.temperature = 37.8;
        assert_eq!(assess(&r).overall(), VitalStatus::Warning);

        r.spo2 = 90;
        assert_eq!(assess(&r).overall(), VitalStatus::Danger);
    }

    #[test]
    fn test_low_battery() {
        let mut r = reading();
        r.battery_level = 19;
        assert!(assess(&r).low_battery);
    }
}
