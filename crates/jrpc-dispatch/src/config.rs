//! Dispatcher configuration.

use serde::{Deserialize, Serialize};

/// Default request body limit.
pub const DEFAULT_MAX_BODY_BYTES: u64 = 1024 * 1024; // 1 MiB

/// Dispatcher configuration settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Largest request body accepted, in bytes.
    pub max_body_bytes: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}
