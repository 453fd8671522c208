//! Error types for the RPC protocol.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes returned in RPC error envelopes.
///
/// Serialized as the bare integer code. Every code carries a fixed
/// human-readable message; details go in the envelope's `data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum ErrorCode {
    /// Body is undecodable JSON or has the wrong shape.
    ParseError,
    /// Body is missing, empty or otherwise not a request object.
    InvalidRequest,
    /// Unknown service, unknown method, or malformed dotted name.
    MethodNotFound,
    /// Argument count or argument type does not match the method.
    InvalidParams,
    /// The dispatcher itself failed (e.g. a result could not be encoded).
    InternalError,
    /// The method reported a failure or panicked.
    ServerError,
}

impl ErrorCode {
    /// Numeric code as sent on the wire.
    pub const fn code(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
            Self::ServerError => -32000,
        }
    }

    /// Fixed message associated with the code.
    pub const fn message(self) -> &'static str {
        match self {
            Self::ParseError => {
                "Invalid JSON was received by the server. \
                 An error occurred on the server while parsing the JSON text."
            }
            Self::InvalidRequest => "The JSON sent is not a valid Request object.",
            Self::MethodNotFound => "The method does not exist / is not available.",
            Self::InvalidParams => "Invalid method parameter(s).",
            Self::InternalError => "Internal JSON-RPC error.",
            Self::ServerError => "Method returned error.",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ParseError => "Parse error",
            Self::InvalidRequest => "Invalid request",
            Self::MethodNotFound => "Method not found",
            Self::InvalidParams => "Invalid params",
            Self::InternalError => "Internal error",
            Self::ServerError => "Server error",
        };
        write!(f, "{} ({})", name, self.code())
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// An integer that is not one of the codes in [`ErrorCode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown RPC error code {0}")]
pub struct UnknownErrorCode(pub i32);

impl TryFrom<i32> for ErrorCode {
    type Error = UnknownErrorCode;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            -32700 => Ok(Self::ParseError),
            -32600 => Ok(Self::InvalidRequest),
            -32601 => Ok(Self::MethodNotFound),
            -32602 => Ok(Self::InvalidParams),
            -32603 => Ok(Self::InternalError),
            -32000 => Ok(Self::ServerError),
            other => Err(UnknownErrorCode(other)),
        }
    }
}

/// RPC error envelope.
///
/// Emitted instead of a response on any failure; never both for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    /// Error code from the table above.
    pub code: ErrorCode,
    /// Fixed message for the code.
    pub message: String,
    /// Diagnostic detail, empty when there is nothing to add.
    #[serde(default)]
    pub data: String,
}

impl RpcError {
    /// Create an error with the code's fixed message and the given detail.
    pub fn new(code: ErrorCode, data: impl Into<String>) -> Self {
        Self {
            code,
            message: code.message().to_string(),
            data: data.into(),
        }
    }

    /// Create a PARSE_ERROR carrying the decoder's diagnostic verbatim.
    pub fn parse_error(diagnostic: impl fmt::Display) -> Self {
        Self::new(ErrorCode::ParseError, diagnostic.to_string())
    }

    /// Create an INVALID_REQUEST error.
    pub fn invalid_request(data: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, data)
    }

    /// Create an INVALID_REQUEST error for an absent or empty body.
    pub fn empty_request() -> Self {
        Self::invalid_request("Empty object received")
    }

    /// Create an INVALID_REQUEST error for a body over the size limit.
    pub fn payload_too_large(size: usize, max: u64) -> Self {
        Self::invalid_request(format!(
            "Request body of {} bytes exceeds maximum of {} bytes",
            size, max
        ))
    }

    /// Create an INVALID_REQUEST error for a body cut off at the size limit.
    pub fn body_limit_exceeded(max: u64) -> Self {
        Self::invalid_request(format!("Request body exceeds maximum of {} bytes", max))
    }

    /// Create a METHOD_NOT_FOUND error for a name without a `service.` prefix.
    pub fn malformed_method_name() -> Self {
        Self::new(
            ErrorCode::MethodNotFound,
            "Provided method name needs to have format service.method",
        )
    }

    /// Create a METHOD_NOT_FOUND error for an unknown service.
    pub fn service_not_found(service: &str) -> Self {
        Self::new(
            ErrorCode::MethodNotFound,
            format!("Provided service {} does not exist", service),
        )
    }

    /// Create a METHOD_NOT_FOUND error for an unknown method of a known service.
    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            ErrorCode::MethodNotFound,
            format!("Provided method {} does not exist", method),
        )
    }

    /// Create an INVALID_PARAMS error for an argument count mismatch.
    pub fn arity_mismatch(required: usize, provided: usize) -> Self {
        let qualifier = if provided > required { "Too many" } else { "Too few" };
        Self::new(
            ErrorCode::InvalidParams,
            format!(
                "{} parameters. Method takes {} params, {} provided",
                qualifier, required, provided
            ),
        )
    }

    /// Create an INVALID_PARAMS error for an argument of the wrong type.
    ///
    /// `position` is 1-based.
    pub fn invalid_param(position: usize, diagnostic: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::InvalidParams,
            format!("Invalid parameter {}: {}", position, diagnostic),
        )
    }

    /// Create a SERVER_ERROR carrying the method's failure message.
    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServerError, message)
    }

    /// Create an INTERNAL_ERROR.
    pub fn internal_error(data: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, data)
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.data.is_empty() {
            write!(f, "{}: {}", self.code, self.message)
        } else {
            write!(f, "{}: {}: {}", self.code, self.message, self.data)
        }
    }
}

impl std::error::Error for RpcError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_wire_table() {
        assert_eq!(ErrorCode::ParseError.code(), -32700);
        assert_eq!(ErrorCode::InvalidRequest.code(), -32600);
        assert_eq!(ErrorCode::MethodNotFound.code(), -32601);
        assert_eq!(ErrorCode::InvalidParams.code(), -32602);
        assert_eq!(ErrorCode::InternalError.code(), -32603);
        assert_eq!(ErrorCode::ServerError.code(), -32000);
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert_eq!(ErrorCode::try_from(-1), Err(UnknownErrorCode(-1)));
        assert_eq!(ErrorCode::try_from(-32601), Ok(ErrorCode::MethodNotFound));
    }

    #[test]
    fn test_error_serializes_lowercase_fields_in_order() {
        let err = RpcError::method_not_found("Get");
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(
            json,
            r#"{"code":-32601,"message":"The method does not exist / is not available.","data":"Provided method Get does not exist"}"#
        );
    }

    #[test]
    fn test_arity_mismatch_wording() {
        let err = RpcError::arity_mismatch(2, 3);
        assert_eq!(err.code, ErrorCode::InvalidParams);
        assert_eq!(err.data, "Too many parameters. Method takes 2 params, 3 provided");

        let err = RpcError::arity_mismatch(2, 1);
        assert_eq!(err.data, "Too few parameters. Method takes 2 params, 1 provided");
    }

    #[test]
    fn test_size_limit_errors_name_the_limit() {
        let err = RpcError::payload_too_large(40, 16);
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        assert_eq!(err.data, "Request body of 40 bytes exceeds maximum of 16 bytes");

        let err = RpcError::body_limit_exceeded(16);
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        assert_eq!(err.data, "Request body exceeds maximum of 16 bytes");
    }

    #[test]
    fn test_error_deserializes_without_data() {
        let err: RpcError =
            serde_json::from_str(r#"{"code":-32000,"message":"Method returned error."}"#).unwrap();
        assert_eq!(err.code, ErrorCode::ServerError);
        assert!(err.data.is_empty());
    }

    #[test]
    fn test_display_includes_data() {
        let err = RpcError::server_error("disk full");
        let msg = err.to_string();
        assert!(msg.contains("-32000"));
        assert!(msg.contains("disk full"));
    }
}
