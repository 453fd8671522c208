//! Configuration merge system
//!
//! Implements the 3-layer configuration merge:
//! 1. Built-in defaults
//! 2. Config file (TOML, passed with `--config`)
//! 3. CLI flags

mod defaults;
mod merge;

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use jrpc_dispatch::DispatchConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use defaults::BuiltinDefaults;
pub use merge::{deep_merge, merge_layers};

/// Effective server configuration after merging all layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub dispatch: DispatchConfig,
    pub log: LogSection,
}

/// `[server]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSection {
    /// Socket address the HTTP transport binds to.
    pub listen: String,
}

/// `[log]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSection {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` takes precedence.
    pub filter: String,
}

/// Values supplied on the command line (layer 3).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub listen: Option<String>,
    pub max_body_bytes: Option<u64>,
}

impl CliOverrides {
    fn to_value(&self) -> Value {
        let mut value = serde_json::json!({});
        if let Some(listen) = &self.listen {
            value["server"] = serde_json::json!({ "listen": listen });
        }
        if let Some(max) = self.max_body_bytes {
            value["dispatch"] = serde_json::json!({ "max_body_bytes": max });
        }
        value
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        let defaults = BuiltinDefaults::default();
        Self {
            server: ServerSection {
                listen: defaults.listen,
            },
            dispatch: DispatchConfig {
                max_body_bytes: defaults.max_body_bytes,
            },
            log: LogSection {
                filter: defaults.log_filter,
            },
        }
    }
}

impl ServerConfig {
    /// Build the effective config from defaults, an optional file and CLI flags.
    pub fn load(path: Option<&Path>, overrides: &CliOverrides) -> Result<Self, ConfigError> {
        let mut layers = vec![BuiltinDefaults::default().to_value()];

        if let Some(path) = path {
            let contents = fs::read_to_string(path)
                .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;
            layers.push(parse_toml(&contents)?);
        }

        layers.push(overrides.to_value());
        Self::from_layers(layers)
    }

    /// Build the effective config from defaults plus TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Self::from_layers(vec![BuiltinDefaults::default().to_value(), parse_toml(contents)?])
    }

    fn from_layers(layers: Vec<Value>) -> Result<Self, ConfigError> {
        let merged = merge_layers(layers);
        let config: ServerConfig = serde_json::from_value(merged)
            .map_err(|e| ConfigError::ParseError(format!("invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// The parsed listen address.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.listen.parse().map_err(|e| {
            ConfigError::ValidationError(format!(
                "server.listen '{}' is not a socket address: {}",
                self.server.listen, e
            ))
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.listen_addr()?;

        if self.dispatch.max_body_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "dispatch.max_body_bytes must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_toml(contents: &str) -> Result<Value, ConfigError> {
    let toml_value: toml::Value = toml::from_str(contents)
        .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;
    Ok(toml_to_json(toml_value))
}

/// Convert TOML Value to JSON Value
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults_only() {
        let config = ServerConfig::load(None, &CliOverrides::default()).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.listen_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_cli_override_wins() {
        let overrides = CliOverrides {
            listen: Some("127.0.0.1:9000".to_string()),
            max_body_bytes: Some(4096),
        };
        let config = ServerConfig::load(None, &overrides).unwrap();

        assert_eq!(config.server.listen, "127.0.0.1:9000");
        assert_eq!(config.dispatch.max_body_bytes, 4096);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ServerConfig::from_toml_str("[log]\nfilter = \"debug\"\n").unwrap();
        assert_eq!(config.log.filter, "debug");
        assert_eq!(config.server.listen, "0.0.0.0:8080");
    }

    #[test]
    fn test_invalid_listen_rejected() {
        let err = ServerConfig::from_toml_str("[server]\nlisten = \"nowhere\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("server.listen"));
    }

    #[test]
    fn test_zero_body_limit_rejected() {
        let err = ServerConfig::from_toml_str("[dispatch]\nmax_body_bytes = 0\n").unwrap_err();
        assert!(err.to_string().contains("max_body_bytes"));
    }

    #[test]
    fn test_wrong_type_is_parse_error() {
        let err =
            ServerConfig::from_toml_str("[dispatch]\nmax_body_bytes = \"lots\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_toml_to_json_tables() {
        let value = parse_toml("a = 1\n[b]\nc = [true, 2.5]\n").unwrap();
        assert_eq!(value, serde_json::json!({"a": 1, "b": {"c": [true, 2.5]}}));
    }
}
