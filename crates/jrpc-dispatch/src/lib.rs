//! JSON-RPC Dispatch Core
//!
//! Maps `Service.Method` names to typed handlers and turns one raw request
//! body into exactly one encoded envelope.
//!
//! This crate is transport-agnostic: the HTTP server and the stdin/stdout
//! runner in the root crate both call [`RpcHandler`].

pub mod config;
pub mod dispatcher;
pub mod method;
pub mod registry;
pub mod rpc;

pub use config::DispatchConfig;
pub use dispatcher::dispatch;
pub use method::{IntoMethod, Method, MethodError, MethodResult};
pub use registry::{LookupError, Registry, RegistryBuilder, RegistrationError, ServiceBuilder};
pub use rpc::RpcHandler;
