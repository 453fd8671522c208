//! RPC response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RpcError;
use crate::request::RpcRequest;

/// Body written when an envelope cannot be serialized.
pub const FALLBACK_ERROR_BODY: &str =
    r#"{"code":-32603,"message":"Internal JSON-RPC error.","data":"response could not be encoded"}"#;

/// RPC success envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    /// Protocol version echoed from the request.
    pub jsonrpc: String,
    /// Value returned by the method.
    pub result: Value,
    /// Request ID echoed from the request.
    pub id: i64,
}

impl RpcResponse {
    /// Create a success response answering `request`.
    pub fn success(request: RpcRequest, result: Value) -> Self {
        Self {
            jsonrpc: request.jsonrpc,
            result,
            id: request.id,
        }
    }
}

/// The single envelope written for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcReply {
    Success(RpcResponse),
    Error(RpcError),
}

impl RpcReply {
    /// Whether this reply is an error envelope.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Encode to the bytes written as the HTTP body.
    pub fn to_bytes(&self) -> Vec<u8> {
        encode_or_fallback(self)
    }
}

impl From<RpcResponse> for RpcReply {
    fn from(response: RpcResponse) -> Self {
        Self::Success(response)
    }
}

impl From<RpcError> for RpcReply {
    fn from(error: RpcError) -> Self {
        Self::Error(error)
    }
}

impl From<Result<RpcResponse, RpcError>> for RpcReply {
    fn from(result: Result<RpcResponse, RpcError>) -> Self {
        match result {
            Ok(response) => Self::Success(response),
            Err(error) => Self::Error(error),
        }
    }
}

/// Serialize `value` to JSON, or emit [`FALLBACK_ERROR_BODY`] if that fails.
///
/// Never returns an empty body.
pub fn encode_or_fallback<T: Serialize + ?Sized>(value: &T) -> Vec<u8> {
    match serde_json::to_vec(value) {
        Ok(bytes) => bytes,
        Err(_) => FALLBACK_ERROR_BODY.as_bytes().to_vec(),
    }
}
