//! client.rs
//!
//! Typed HTTP client for a running pendant service. Failures are collapsed
//! into the two messages a caregiver needs: the device cannot be reached, or
//! the SOS did not go out. Nothing is retried here.

use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::contract::{self, ApiRoute, HttpMethod};
use crate::types::{DeviceReading, HistoryPoint, SosAck};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Cannot reach device at {url}: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("Could not send SOS, call emergency services directly ({reason})")]
    SosFailed { reason: String },

    #[error("HTTP client setup failed: {0}")]
    Setup(#[from] reqwest::Error),
}

#[derive(Clone, Debug)]
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: String,
}

impl DeviceClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &ApiRoute) -> String {
        format!("{}{}", self.base_url, contract::build_url(route.path, &[]))
    }

    /// Issue `route` and decode its JSON body. Any transport error or
    /// non-2xx status is reported as a reason string.
    async fn call<T: DeserializeOwned>(&self, route: &ApiRoute) -> Result<T, (String, String)> {
        let url = self.url(route);
        let request = match route.method {
            HttpMethod::Get => self.http.get(&url),
            HttpMethod::Post => self.http.post(&url),
        };

        log::debug!("{} {}", route.method, url);

        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| (url.clone(), e.to_string()))?;

        response.json::<T>().await.map_err(|e| (url, e.to_string()))
    }

    pub async fn fetch_status(&self) -> Result<DeviceReading, ClientError> {
        self.call(&contract::STATUS)
            .await
            .map_err(|(url, reason)| ClientError::Unreachable { url, reason })
    }

    pub async fn fetch_history(&self) -> Result<Vec<HistoryPoint>, ClientError> {
        self.call(&contract::HISTORY)
            .await
            .map_err(|(url, reason)| ClientError::Unreachable { url, reason })
    }

    pub async fn send_sos(&self) -> Result<SosAck, ClientError> {
        let ack: SosAck = self
            .call(&contract::SOS)
            .await
            .map_err(|(_, reason)| ClientError::SosFailed { reason })?;

        if !ack.sent {
            return Err(ClientError::SosFailed {
                reason: "service reported the alert as not sent".to_string(),
            });
        }
        Ok(ack)
    }
}
