//! RPC request types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// RPC request envelope.
///
/// Each HTTP body carries exactly one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Protocol version, echoed back verbatim and never validated.
    #[serde(default)]
    pub jsonrpc: String,
    /// Dotted method name, `Service.Method`.
    pub method: String,
    /// Positional arguments. Absent or `null` means no arguments.
    #[serde(
        default,
        deserialize_with = "nullable_params",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub params: Vec<Value>,
    /// Caller-chosen request ID, echoed in the response.
    #[serde(default)]
    pub id: i64,
}

impl RpcRequest {
    /// Create a request with the given method and positional arguments.
    pub fn new(
        jsonrpc: impl Into<String>,
        method: impl Into<String>,
        params: Vec<Value>,
        id: i64,
    ) -> Self {
        Self {
            jsonrpc: jsonrpc.into(),
            method: method.into(),
            params,
            id,
        }
    }
}

fn nullable_params<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}
