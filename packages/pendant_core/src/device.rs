//! device.rs
//!
//! The device context owns everything the request handlers touch: the
//! current-reading cell, the random source feeding the generators, and the
//! log of SOS triggers. It is passed to the server explicitly and shared
//! behind an `Arc`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::PendantError;
use crate::telemetry::{heart_rate_history, TelemetryGenerator, TelemetryProfile};
use crate::types::{DeviceReading, HistoryPoint, SosAck, SosEvent};

/// Hand-off point for triggered alerts.
///
/// A deployment that notifies emergency contacts would implement this; the
/// service itself only ships [`LogAlertSink`].
#[async_trait]
pub trait AlertSink {
    async fn dispatch(&self, event: &SosEvent) -> Result<(), PendantError>;
}

/// Writes every alert to the log and reports success.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogAlertSink;

#[async_trait]
impl AlertSink for LogAlertSink {
    async fn dispatch(&self, event: &SosEvent) -> Result<(), PendantError> {
        log::warn!(
            "SOS alert triggered (event {} at {})",
            event.id,
            event.triggered_at.to_rfc3339()
        );
        Ok(())
    }
}

/// Most SOS events kept in memory. Older events are dropped first.
pub const MAX_SOS_EVENTS: usize = 256;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct DeviceContext {
    generator: TelemetryGenerator,
    rng: Mutex<StdRng>,
    current: Mutex<DeviceReading>,
    sos_events: Mutex<VecDeque<SosEvent>>,
    alert_sink: Arc<dyn AlertSink + Send + Sync>,
}

impl DeviceContext {
    /// Create a context seeded from OS entropy.
    pub fn new(profile: TelemetryProfile) -> Self {
        Self::with_rng(profile, StdRng::from_entropy())
    }

    /// Create a context whose readings are reproducible for a given seed.
    pub fn seeded(profile: TelemetryProfile, seed: u64) -> Self {
        Self::with_rng(profile, StdRng::seed_from_u64(seed))
    }

    /// Seeded when `seed` is set, entropy otherwise.
    pub fn from_seed(profile: TelemetryProfile, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(profile, seed),
            None => Self::new(profile),
        }
    }

    fn with_rng(profile: TelemetryProfile, mut rng: StdRng) -> Self {
        let generator = TelemetryGenerator::new(profile);
        let initial = generator.generate(&mut rng, Utc::now());

        Self {
            generator,
            rng: Mutex::new(rng),
            current: Mutex::new(initial),
            sos_events: Mutex::new(VecDeque::with_capacity(MAX_SOS_EVENTS)),
            alert_sink: Arc::new(LogAlertSink),
        }
    }

    /// Route SOS triggers to a different sink.
    pub fn with_alert_sink(mut self, sink: impl AlertSink + Send + Sync + 'static) -> Self {
        self.alert_sink = Arc::new(sink);
        self
    }

    pub fn profile(&self) -> &TelemetryProfile {
        self.generator.profile()
    }

    /// Generate a fresh reading, make it the current one and return it.
    pub fn latest_reading(&self) -> DeviceReading {
        let reading = {
            let mut rng = lock(&self.rng);
            self.generator.generate(&mut *rng, Utc::now())
        };

        if reading.is_fallen {
            log::info!(
                "Fall detected: {:.2} g at {}",
                reading.acceleration().magnitude(),
                reading.timestamp.to_rfc3339()
            );
        }

        *lock(&self.current) = reading.clone();
        reading
    }

    /// The reading most recently handed out, without regenerating.
    pub fn current_reading(&self) -> DeviceReading {
        lock(&self.current).clone()
    }

    /// A fresh 25-point heart-rate series ending now.
    pub fn history(&self) -> Vec<HistoryPoint> {
        let mut rng = lock(&self.rng);
        heart_rate_history(&mut *rng, Utc::now())
    }

    /// Record an SOS trigger and pass it to the alert sink. The current
    /// reading is left untouched.
    pub async fn send_sos(&self) -> Result<SosAck, PendantError> {
        let event = SosEvent::new();
        {
            let mut events = lock(&self.sos_events);
            if events.len() == MAX_SOS_EVENTS {
                events.pop_front();
            }
            events.push_back(event.clone());
        }

        self.alert_sink.dispatch(&event).await?;
        Ok(SosAck { sent: true })
    }

    /// Snapshot of the last [`MAX_SOS_EVENTS`] SOS triggers, oldest first.
    pub fn sos_events(&self) -> Vec<SosEvent> {
        lock(&self.sos_events).iter().cloned().collect()
    }
}

impl Default for DeviceContext {
    fn default() -> Self {
        Self::new(TelemetryProfile::default())
    }
}
