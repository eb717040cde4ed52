//! Terminal rendering for readings and history

use chrono::Local;
use pendant::vitals::{self, VitalStatus};
use pendant::{DeviceReading, HistoryPoint, SosAck};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

fn marker(status: VitalStatus) -> &'static str {
    match status {
        VitalStatus::Normal => " ",
        VitalStatus::Warning => "!",
        VitalStatus::Danger => "‼",
    }
}

fn link(up: bool) -> &'static str {
    if up {
        "on"
    } else {
        "off"
    }
}

/// One block of text describing a reading.
pub fn render_reading(reading: &DeviceReading) -> String {
    let assessment = vitals::assess(reading);
    let battery = if assessment.low_battery {
        format!("{}% LOW", reading.battery_level)
    } else {
        format!("{}%", reading.battery_level)
    };
    let banner = if reading.is_fallen {
        "FALL DETECTED".to_string()
    } else {
        "Status: SAFE".to_string()
    };

    let mut out = String::new();
    out.push_str(&format!(
        "VitaPendant  wifi {}  bluetooth {}  battery {}\n",
        link(reading.wifi_connected),
        link(reading.bluetooth_connected),
        battery
    ));
    out.push_str(&format!(
        "{}  (updated {})\n",
        banner,
        reading.timestamp.with_timezone(&Local).format("%H:%M:%S")
    ));
    out.push_str(&format!("{} Heart rate   {:>5} bpm\n", marker(assessment.heart_rate), reading.heart_rate));
    out.push_str(&format!("{} SpO2         {:>5} %\n", marker(assessment.spo2), reading.spo2));
    out.push_str(&format!("{} Steps        {:>5}\n", marker(assessment.steps), reading.steps));
    out.push_str(&format!("{} Temperature  {:>5.1} °C\n", marker(assessment.temperature), reading.temperature));
    out
}

/// Heart-rate sparkline scaled between the series min and max.
pub fn sparkline(history: &[HistoryPoint]) -> String {
    let (min, max) = match (
        history.iter().map(|p| p.heart_rate).min(),
        history.iter().map(|p| p.heart_rate).max(),
    ) {
        (Some(min), Some(max)) => (min, max),
        _ => return String::new(),
    };
    let span = (max - min).max(1) as usize;
    let top = SPARK_LEVELS.len() - 1;

    history
        .iter()
        .map(|p| SPARK_LEVELS[(p.heart_rate - min) as usize * top / span])
        .collect()
}

pub fn render_history(history: &[HistoryPoint]) -> String {
    let (first, last) = match (history.first(), history.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return "No heart-rate history\n".to_string(),
    };
    let min = history.iter().map(|p| p.heart_rate).min().unwrap_or_default();
    let max = history.iter().map(|p| p.heart_rate).max().unwrap_or_default();

    format!(
        "Heart rate {} → {}  {}  ({}-{} bpm)\n",
        first.time.with_timezone(&Local).format("%H:%M"),
        last.time.with_timezone(&Local).format("%H:%M"),
        sparkline(history),
        min,
        max
    )
}

/// The service only records the alert; nobody is contacted.
pub fn render_sos_ack(ack: &SosAck) -> String {
    if ack.sent {
        "SOS sent\n".to_string()
    } else {
        "SOS not acknowledged by the device. Call emergency services directly.\n".to_string()
    }
}
