//! Listener configuration shared by every scaffold.
//!
//! Values come from the environment (`HOST`, `AWS_LWA_PORT`, `LOG_LEVEL`);
//! each scaffold supplies its own default port.

use std::net::Ipv6Addr;

use thiserror::Error;

pub const HOST_VAR: &str = "HOST";
pub const PORT_VAR: &str = "AWS_LWA_PORT";
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}={value:?} is not a valid port number")]
    InvalidPort { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// IP literal or hostname; resolved when the listener binds.
    pub listen_address: String,
    pub listen_port: u16,
    pub log_level: String,
}

impl ServerConfig {
    pub fn new(default_port: u16) -> Self {
        Self {
            listen_address: DEFAULT_HOST.to_string(),
            listen_port: default_port,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }

    /// Read the process environment, falling back to the defaults for unset
    /// variables. A set-but-malformed value is an error.
    pub fn from_env(default_port: u16) -> Result<Self, ConfigError> {
        Self::from_lookup(default_port, |key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an arbitrary variable source.
    pub fn from_lookup<F>(default_port: u16, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(default_port);

        if let Some(host) = lookup(HOST_VAR).filter(|h| !h.trim().is_empty()) {
            config.listen_address = host.trim().to_string();
        }

        if let Some(port) = lookup(PORT_VAR) {
            config.listen_port = port.trim().parse().map_err(|_| ConfigError::InvalidPort {
                var: PORT_VAR,
                value: port.clone(),
            })?;
        }

        if let Some(level) = lookup(LOG_LEVEL_VAR).filter(|l| !l.trim().is_empty()) {
            config.log_level = level.trim().to_lowercase();
        }

        Ok(config)
    }

    /// `host:port` in the form Pingora's `add_tcp` expects. Bare IPv6
    /// literals are bracketed; anything else is passed through for the
    /// listener to resolve.
    pub fn listen_addr(&self) -> String {
        let host = self.listen_address.as_str();
        if host.parse::<Ipv6Addr>().is_ok() {
            format!("[{}]:{}", host, self.listen_port)
        } else {
            format!("{}:{}", host, self.listen_port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(8081, lookup(&[])).unwrap();
        assert_eq!(config.listen_addr(), "0.0.0.0:8081");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ServerConfig::from_lookup(
            8081,
            lookup(&[("HOST", "127.0.0.1"), ("AWS_LWA_PORT", "9000"), ("LOG_LEVEL", "DEBUG")]),
        )
        .unwrap();
        assert_eq!(config.listen_addr(), "127.0.0.1:9000");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn ipv6_host_is_bracketed() {
        let config = ServerConfig::from_lookup(8080, lookup(&[("HOST", "::1")])).unwrap();
        assert_eq!(config.listen_addr(), "[::1]:8080");
    }

    #[test]
    fn malformed_port_is_an_error() {
        let err = ServerConfig::from_lookup(8081, lookup(&[("AWS_LWA_PORT", "eighty")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidPort {
                var: "AWS_LWA_PORT",
                value: "eighty".to_string()
            }
        );
        assert!(err.to_string().contains("AWS_LWA_PORT"));

        assert!(ServerConfig::from_lookup(8081, lookup(&[("AWS_LWA_PORT", "70000")])).is_err());
    }

    #[test]
    fn hostnames_are_left_for_the_listener() {
        let config = ServerConfig::from_lookup(8081, lookup(&[("HOST", "localhost")])).unwrap();
        assert_eq!(config.listen_address, "localhost");
        assert_eq!(config.listen_addr(), "localhost:8081");

        let config =
            ServerConfig::from_lookup(8000, lookup(&[("HOST", " scaffold.internal ")])).unwrap();
        assert_eq!(config.listen_addr(), "scaffold.internal:8000");
    }

    #[test]
    fn empty_host_keeps_default() {
        let config = ServerConfig::from_lookup(8081, lookup(&[("HOST", "  ")])).unwrap();
        assert_eq!(config.listen_addr(), "0.0.0.0:8081");
    }
}
