use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One hourly heart-rate sample for the dashboard chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    pub time: DateTime<Utc>,
    pub heart_rate: u32,
}
