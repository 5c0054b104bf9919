//! Service configuration
//!
//! Defaults match the address the web front end talks to; each value can be
//! overridden through `STOCK_SIM_*` environment variables or CLI flags.

use std::net::SocketAddr;
use thiserror::Error;
use tracing::Level;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("STOCK_SIM_PORT must be a port between 1 and 65535, got {0:?}")]
    Port(String),

    #[error("STOCK_SIM_LOG_LEVEL must be trace, debug, info, warn or error, got {0:?}")]
    LogLevel(String),

    #[error("{0} is not a bindable socket address")]
    Address(String),
}

/// HTTP service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Used when `RUST_LOG` is unset.
    pub log_level: Level,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            log_level: Level::INFO,
        }
    }
}

impl ServerConfig {
    /// Reads `STOCK_SIM_HOST`, `STOCK_SIM_PORT` and `STOCK_SIM_LOG_LEVEL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(host) = lookup("STOCK_SIM_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("STOCK_SIM_PORT") {
            config.port = port.trim().parse().map_err(|_| ConfigError::Port(port))?;
        }
        if let Some(level) = lookup("STOCK_SIM_LOG_LEVEL") {
            config.log_level = level.trim().parse().map_err(|_| ConfigError::LogLevel(level))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Port(self.port.to_string()));
        }
        self.socket_addr().map(|_| ())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::Address(addr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_bind_localhost_5000() {
        let config = ServerConfig::default();
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:5000");
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("STOCK_SIM_HOST", "0.0.0.0"),
            ("STOCK_SIM_PORT", "8081"),
            ("STOCK_SIM_LOG_LEVEL", "DEBUG"),
        ]))
        .unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8081);
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = ServerConfig::from_lookup(lookup_from(&[("STOCK_SIM_PORT", "http")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Port("http".to_string()));

        let err = ServerConfig::from_lookup(lookup_from(&[("STOCK_SIM_PORT", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Port(_)));
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let err = ServerConfig::from_lookup(lookup_from(&[("STOCK_SIM_LOG_LEVEL", "loud")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::LogLevel("loud".to_string()));
    }

    #[test]
    fn unparseable_host_is_rejected() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Address(_))));
    }
}
