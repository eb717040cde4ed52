//! types/alert.rs
//!
//! Emergency alert acknowledgement and the event recorded for each trigger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of a `POST /api/sos` response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SosAck {
    pub sent: bool,
}

/// A single SOS trigger as seen by the service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SosEvent {
    pub id: Uuid,
    pub triggered_at: DateTime<Utc>,
}

impl SosEvent {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            triggered_at: Utc::now(),
        }
    }
}

impl Default for SosEvent {
    fn default() -> Self {
        Self::new()
    }
}
