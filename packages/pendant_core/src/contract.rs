//! contract.rs
//!
//! The HTTP contract shared by the server filters and [`crate::client`].
//! Paths, methods and response shapes are defined once here.

use std::fmt;

use serde::{Deserialize, Serialize};

pub use crate::types::{DeviceReading, HistoryPoint, SosAck};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApiRoute {
    pub method: HttpMethod,
    pub path: &'static str,
}

impl ApiRoute {
    /// The non-empty path segments, in order.
    pub fn segments(&self) -> impl Iterator<Item = &'static str> {
        self.path.split('/').filter(|segment| !segment.is_empty())
    }
}

/// `GET` the latest reading. Responds with [`DeviceReading`].
pub const STATUS: ApiRoute = ApiRoute {
    method: HttpMethod::Get,
    path: "/api/status",
};

/// `GET` the 25-point heart-rate history. Responds with `Vec<HistoryPoint>`.
pub const HISTORY: ApiRoute = ApiRoute {
    method: HttpMethod::Get,
    path: "/api/history",
};

/// `POST` an emergency alert. Responds with [`SosAck`].
pub const SOS: ApiRoute = ApiRoute {
    method: HttpMethod::Post,
    path: "/api/sos",
};

pub const ROUTES: [ApiRoute; 3] = [STATUS, HISTORY, SOS];

/// Body of every non-2xx response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Substitute `:name` segments in `path` with the matching entry of
/// `params`. Segments without a matching param are left as they are.
pub fn build_url(path: &str, params: &[(&str, &str)]) -> String {
    path.split('/')
        .map(|segment| {
            segment
                .strip_prefix(':')
                .and_then(|name| params.iter().find(|(key, _)| *key == name))
                .map(|(_, value)| *value)
                .unwrap_or(segment)
        })
        .collect::<Vec<_>>()
        .join("/")
}
