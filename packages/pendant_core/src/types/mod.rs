//! types/mod.rs
//!
//! Wire types shared by the service and its clients. Field names are
//! camelCase on the wire.

pub mod alert;
pub mod history;
pub mod reading;

pub use alert::{SosAck, SosEvent};
pub use history::HistoryPoint;
pub use reading::{Acceleration, DeviceReading, DEVICE_ID};
