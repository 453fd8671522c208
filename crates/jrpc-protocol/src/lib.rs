//! JSON-RPC Protocol Types
//!
//! Defines the JSON envelopes exchanged as HTTP bodies between a caller and
//! the dispatcher: the request, the success response and the error object.

pub mod error;
pub mod request;
pub mod response;

pub use error::{ErrorCode, RpcError, UnknownErrorCode};
pub use request::RpcRequest;
pub use response::{encode_or_fallback, RpcReply, RpcResponse, FALLBACK_ERROR_BODY};
