//! types/reading.rs
//!
//! One snapshot of every sensor on the pendant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The mock backend only ever reports a single pendant.
pub const DEVICE_ID: u32 = 1;

/// Tri-axial acceleration in g.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Acceleration {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Acceleration {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Signal vector magnitude, the Euclidean norm of the three axes.
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Device reading as served by `GET /api/status`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceReading {
    pub id: u32,
    /// Beats per minute
    pub heart_rate: u32,
    /// Blood oxygen saturation, percent
    pub spo2: u32,
    pub steps: u32,
    /// Skin temperature in °C, one decimal
    pub temperature: f64,
    /// Derived from the acceleration fields, never sampled on its own
    pub is_fallen: bool,
    pub battery_level: u32,
    pub wifi_connected: bool,
    pub bluetooth_connected: bool,
    pub accel_x: f64,
    pub accel_y: f64,
    pub accel_z: f64,
    pub timestamp: DateTime<Utc>,
}

impl DeviceReading {
    pub fn acceleration(&self) -> Acceleration {
        Acceleration::new(self.accel_x, self.accel_y, self.accel_z)
    }
}
