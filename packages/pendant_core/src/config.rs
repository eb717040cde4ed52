//! config.rs
//!
//! Service and client configuration. Values come from defaults, then an
//! optional JSON file, then `PENDANT_*` environment variables.

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

use ::config::{Config, Environment, File, FileFormat, Map};
use serde::{Deserialize, Serialize};

use crate::error::PendantError;
use crate::telemetry::{TelemetryProfile, FALL_THRESHOLD_G, IMPACT_PROBABILITY, LINK_UP_PROBABILITY};

pub const ENV_PREFIX: &str = "PENDANT";
/// Nesting separator for full keys, as in `PENDANT_CLIENT__TIMEOUT_SECS`.
pub const ENV_SEPARATOR: &str = "__";

pub const ENV_HOST: &str = "PENDANT_HOST";
pub const ENV_PORT: &str = "PENDANT_PORT";
pub const ENV_SEED: &str = "PENDANT_SEED";
pub const ENV_FALL_THRESHOLD: &str = "PENDANT_FALL_THRESHOLD";
pub const ENV_URL: &str = "PENDANT_URL";

/// Short variables for the most common settings and the key each sets.
const ENV_SHORTHANDS: [(&str, &str); 5] = [
    (ENV_HOST, "server.host"),
    (ENV_PORT, "server.port"),
    (ENV_SEED, "telemetry.seed"),
    (ENV_FALL_THRESHOLD, "telemetry.fall_threshold_g"),
    (ENV_URL, "client.base_url"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Fixed seed for reproducible readings; entropy when absent.
    pub seed: Option<u64>,
    pub fall_threshold_g: f64,
    pub impact_probability: f64,
    pub link_up_probability: f64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            seed: None,
            fall_threshold_g: FALL_THRESHOLD_G,
            impact_probability: IMPACT_PROBABILITY,
            link_up_probability: LINK_UP_PROBABILITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub status_interval_secs: u64,
    pub history_interval_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 10,
            status_interval_secs: 5,
            history_interval_secs: 30,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status_interval_secs)
    }

    pub fn history_interval(&self) -> Duration {
        Duration::from_secs(self.history_interval_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PendantConfig {
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub client: ClientConfig,
}

impl PendantConfig {
    /// Defaults, then `path` if given, then the process environment
    /// (including a `.env` file when one exists).
    pub fn load(path: Option<&Path>) -> Result<Self, PendantError> {
        let _ = dotenvy::dotenv();
        Self::load_from(path, std::env::vars().collect())
    }

    /// Layer `path` and the variables in `env` over the defaults, then
    /// validate. Shorthand variables win over full `PENDANT_<SECTION>__<KEY>`
    /// names.
    pub fn load_from(path: Option<&Path>, env: Map<String, String>) -> Result<Self, PendantError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Json));
            log::debug!("Loading config from {}", path.display());
        }

        for (var, key) in ENV_SHORTHANDS {
            builder = builder.set_override_option(key, env.get(var).cloned())?;
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .source(Some(env)),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PendantError> {
        if self.server.port == 0 {
            return Err(PendantError::InvalidConfig("server.port must be non-zero".into()));
        }
        let threshold = self.telemetry.fall_threshold_g;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(PendantError::InvalidConfig(format!(
                "telemetry.fall_threshold_g must be a positive number, got {}",
                threshold
            )));
        }
        for (name, p) in [
            ("telemetry.impact_probability", self.telemetry.impact_probability),
            ("telemetry.link_up_probability", self.telemetry.link_up_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(PendantError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, p
                )));
            }
        }
        if self.client.status_interval_secs == 0 || self.client.history_interval_secs == 0 {
            return Err(PendantError::InvalidConfig(
                "client polling intervals must be non-zero".into(),
            ));
        }
        if self.client.timeout_secs == 0 {
            return Err(PendantError::InvalidConfig("client.timeout_secs must be non-zero".into()));
        }
        Ok(())
    }

    pub fn server_address(&self) -> Result<SocketAddr, PendantError> {
        let mut addrs = (self.server.host.as_str(), self.server.port).to_socket_addrs()?;
        addrs.next().ok_or_else(|| {
            PendantError::InvalidConfig(format!(
                "server.host {} does not resolve to an address",
                self.server.host
            ))
        })
    }

    pub fn telemetry_profile(&self) -> TelemetryProfile {
        TelemetryProfile::default()
            .with_fall_threshold(self.telemetry.fall_threshold_g)
            .with_impact_probability(self.telemetry.impact_probability)
            .with_link_up_probability(self.telemetry.link_up_probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Map<String, String> {
        vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn json_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = PendantConfig::load_from(None, Map::new()).unwrap();
        assert_eq!(config, PendantConfig::default());
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.client.status_interval(), Duration::from_secs(5));
        assert_eq!(config.client.history_interval(), Duration::from_secs(30));
        assert_eq!(config.telemetry_profile(), TelemetryProfile::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = json_file(r#"{ "server": { "port": 8080 }, "telemetry": { "seed": 7 } }"#);

        let config = PendantConfig::load_from(Some(file.path()), Map::new()).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.telemetry.seed, Some(7));
        assert_eq!(config.telemetry.fall_threshold_g, FALL_THRESHOLD_G);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let file = json_file("not json");

        let err = PendantConfig::load_from(Some(file.path()), Map::new()).unwrap_err();
        assert!(matches!(err, PendantError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = PendantConfig::load_from(Some(&path), Map::new()).unwrap_err();
        assert!(matches!(err, PendantError::Config(_)));
    }

    #[test]
    fn test_shorthand_env_overrides() {
        let vars = env(&[
            (ENV_HOST, "0.0.0.0"),
            (ENV_PORT, "9000"),
            (ENV_SEED, "123"),
            (ENV_FALL_THRESHOLD, "3.0"),
            (ENV_URL, "http://pendant.local:9000"),
        ]);

        let config = PendantConfig::load_from(None, vars).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.telemetry.seed, Some(123));
        assert_eq!(config.telemetry.fall_threshold_g, 3.0);
        assert_eq!(config.client.base_url, "http://pendant.local:9000");
    }

    #[test]
    fn test_nested_env_keys_reach_every_field() {
        let vars = env(&[
            ("PENDANT_TELEMETRY__IMPACT_PROBABILITY", "0.2"),
            ("PENDANT_CLIENT__TIMEOUT_SECS", "3"),
            ("PENDANT_CLIENT__HISTORY_INTERVAL_SECS", "60"),
        ]);

        let config = PendantConfig::load_from(None, vars).unwrap();

        assert_eq!(config.telemetry.impact_probability, 0.2);
        assert_eq!(config.client.timeout(), Duration::from_secs(3));
        assert_eq!(config.client.history_interval(), Duration::from_secs(60));
        assert_eq!(config.client.status_interval_secs, 5);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = json_file(r#"{ "server": { "host": "10.0.0.2", "port": 8080 } }"#);
        let vars = env(&[(ENV_PORT, "9000"), ("PENDANT_SERVER__HOST", "10.0.0.3")]);

        let config = PendantConfig::load_from(Some(file.path()), vars).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "10.0.0.3");
    }

    #[test]
    fn test_shorthand_wins_over_nested_key() {
        let vars = env(&[(ENV_PORT, "9000"), ("PENDANT_SERVER__PORT", "7000")]);

        let config = PendantConfig::load_from(None, vars).unwrap();
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_unrelated_env_is_ignored() {
        let vars = env(&[("PATH", "/usr/bin"), ("PENDANTIC", "1")]);
        assert_eq!(PendantConfig::load_from(None, vars).unwrap(), PendantConfig::default());
    }

    #[test]
    fn test_bad_env_value_is_rejected() {
        let err = PendantConfig::load_from(None, env(&[(ENV_PORT, "eighty")])).unwrap_err();
        assert!(matches!(err, PendantError::Config(_)));
    }

    #[test]
    fn test_loaded_values_are_validated() {
        let err = PendantConfig::load_from(None, env(&[(ENV_PORT, "0")])).unwrap_err();
        assert!(matches!(err, PendantError::InvalidConfig(_)));

        let file = json_file(r#"{ "telemetry": { "link_up_probability": 2.0 } }"#);
        let err = PendantConfig::load_from(Some(file.path()), Map::new()).unwrap_err();
        assert!(matches!(err, PendantError::InvalidConfig(_)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = PendantConfig::default();
        config.telemetry.impact_probability = 1.5;
        assert!(config.validate().is_err());

        let mut config = PendantConfig::default();
        config.telemetry.fall_threshold_g = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = PendantConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = PendantConfig::default();
        config.client.status_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_server_address() {
        let config = PendantConfig::default();
        assert_eq!(config.server_address().unwrap(), "127.0.0.1:5000".parse::<SocketAddr>().unwrap());
    }
}
