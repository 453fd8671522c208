//! Built-in server defaults (layer 1)
//!
//! Hardcoded defaults for all configuration values.

use jrpc_dispatch::config::DEFAULT_MAX_BODY_BYTES;
use serde::{Deserialize, Serialize};

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Listen address (default: "0.0.0.0:8080")
    pub listen: String,

    /// Largest accepted request body (default: 1 MiB)
    pub max_body_bytes: u64,

    /// Log filter directive (default: "info")
    pub log_filter: String,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_filter: "info".to_string(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "server": {
                "listen": self.listen
            },
            "dispatch": {
                "max_body_bytes": self.max_body_bytes
            },
            "log": {
                "filter": self.log_filter
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = BuiltinDefaults::default();
        assert_eq!(defaults.listen, "0.0.0.0:8080");
        assert_eq!(defaults.max_body_bytes, 1024 * 1024);
        assert_eq!(defaults.log_filter, "info");
    }

    #[test]
    fn test_to_value() {
        let value = BuiltinDefaults::default().to_value();

        assert_eq!(value["server"]["listen"], "0.0.0.0:8080");
        assert_eq!(value["dispatch"]["max_body_bytes"], 1048576);
        assert_eq!(value["log"]["filter"], "info");
    }
}
