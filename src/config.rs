//! TOML configuration.
//!
//! Every field has a default, so an empty file is a valid config:
//!
//! ```toml
//! [server]
//! addr = "0.0.0.0:3000"
//!
//! [router]
//! params_capacity = 8
//! pool_max_idle = 1024
//! ```

use std::net::SocketAddr;
use std::path::Path;

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub router: RouterConfig,
}

impl Config {
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml(&source)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { addr: SocketAddr::from(([0, 0, 0, 0], 3000)) }
    }
}

/// Parameter pool tuning.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
    /// Parameter slots preallocated in each new buffer.
    pub params_capacity: usize,
    /// Idle buffers the pool retains. Buffers released past this are freed.
    pub pool_max_idle: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self { params_capacity: 8, pool_max_idle: 1024 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.server.addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.router.params_capacity, 8);
        assert_eq!(config.router.pool_max_idle, 1024);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = Config::from_toml(
            r#"
            [server]
            addr = "127.0.0.1:8080"

            [router]
            pool_max_idle = 16
            "#,
        )
        .unwrap();

        assert_eq!(config.server.addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.router.params_capacity, 8);
        assert_eq!(config.router.pool_max_idle, 16);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::from_toml("[router]\nmax_params = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::load("/nonexistent/tsuji.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
