// Pendant - Wearable Health Telemetry Service

pub mod client;
pub mod config;
pub mod contract;
pub mod device;
pub mod error;
pub mod server;
pub mod telemetry;
pub mod types;
pub mod vitals;

pub use client::{ClientError, DeviceClient};
pub use config::PendantConfig;
pub use device::{AlertSink, DeviceContext, LogAlertSink};
pub use error::PendantError;
pub use telemetry::{FallDetector, TelemetryGenerator, TelemetryProfile};
pub use types::{Acceleration, DeviceReading, HistoryPoint, SosAck, SosEvent};
