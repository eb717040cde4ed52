use std::net::SocketAddr;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PendantError {
    #[error("Config error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Address resolution failed: {0}")]
    Resolve(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Failed to bind {addr}: {reason}")]
    Bind { addr: SocketAddr, reason: String },

    #[error("Alert dispatch failed: {0}")]
    AlertDispatch(String),
}
