//! jrpc-server - Minimal JSON-RPC over HTTP
//!
//! This crate wires the dispatch core (`jrpc-dispatch`) to its outer
//! collaborators: layered configuration, logging, the built-in `Health`
//! service and the HTTP transport.

pub mod api;
pub mod config;
pub mod logging;
pub mod server;

pub use config::{CliOverrides, ConfigError, ServerConfig};
pub use jrpc_dispatch::{
    DispatchConfig, MethodError, MethodResult, Registry, RegistryBuilder, RegistrationError,
    RpcHandler,
};
pub use jrpc_protocol::{ErrorCode, RpcError, RpcReply, RpcRequest, RpcResponse};
pub use server::{build_router, AppState, HttpServer, ServeError};

/// Build the registry holding every built-in service.
pub fn default_registry() -> Result<Registry, RegistrationError> {
    let mut builder = RegistryBuilder::new();
    api::register_all(&mut builder)?;
    Ok(builder.build())
}
