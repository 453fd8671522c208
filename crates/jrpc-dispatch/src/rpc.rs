//! Byte-level RPC Handler
//!
//! The single entry point a transport calls once per request. It owns the
//! whole read, decode, dispatch, encode and write sequence: the transport
//! hands over the raw request body and gets back exactly one encoded
//! envelope, either a response or an error.

use std::io::{self, Read, Write};
use std::sync::Arc;

use jrpc_protocol::{RpcError, RpcReply, RpcRequest};

use crate::config::DispatchConfig;
use crate::dispatcher;
use crate::registry::Registry;

/// Main RPC handler, shared by every request.
#[derive(Debug, Clone)]
pub struct RpcHandler {
    registry: Arc<Registry>,
    config: DispatchConfig,
}

impl RpcHandler {
    /// Create a handler owning a frozen registry.
    pub fn new(registry: Registry, config: DispatchConfig) -> Self {
        Self::with_shared_registry(Arc::new(registry), config)
    }

    /// Create a handler over a registry already shared elsewhere.
    pub fn with_shared_registry(registry: Arc<Registry>, config: DispatchConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Handle one raw request body, returning the encoded envelope.
    pub fn handle(&self, body: &[u8]) -> Vec<u8> {
        self.reply(body).to_bytes()
    }

    /// Handle one raw request body, returning the envelope before encoding.
    pub fn reply(&self, body: &[u8]) -> RpcReply {
        let request = match self.read_request(body) {
            Ok(request) => request,
            Err(err) => {
                tracing::debug!(code = err.code.code(), data = %err.data, "rejected request body");
                return RpcReply::Error(err);
            }
        };

        let span = tracing::debug_span!("dispatch", method = %request.method, id = request.id);
        let _enter = span.enter();

        tracing::debug!("dispatching request");
        let result = dispatcher::dispatch(&self.registry, request);
        if let Err(err) = &result {
            tracing::debug!(code = err.code.code(), "request failed");
        }
        result.into()
    }

    /// Run the handler, reading stdin to EOF and writing to stdout.
    pub fn run(&self) -> io::Result<()> {
        self.run_with_io(&mut io::stdin().lock(), &mut io::stdout().lock())
    }

    /// Run the handler with custom I/O.
    ///
    /// Reads the reader to EOF as one request body and writes one envelope
    /// followed by a newline.
    pub fn run_with_io<R: Read, W: Write>(&self, reader: &mut R, writer: &mut W) -> io::Result<()> {
        let mut body = Vec::new();
        let reply = match reader.read_to_end(&mut body) {
            Ok(_) => self.reply(&body),
            Err(e) => RpcReply::Error(RpcError::invalid_request(format!(
                "failed to read request: {}",
                e
            ))),
        };

        writer.write_all(&reply.to_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()
    }

    /// Check the body is present and within limits, then decode it.
    fn read_request(&self, body: &[u8]) -> Result<RpcRequest, RpcError> {
        let trimmed = trim_ascii_whitespace(body);
        if trimmed.is_empty() || trimmed == b"null" {
            return Err(RpcError::empty_request());
        }

        if body.len() as u64 > self.config.max_body_bytes {
            return Err(RpcError::payload_too_large(body.len(), self.config.max_body_bytes));
        }

        serde_json::from_slice(body).map_err(RpcError::parse_error)
    }
}

fn trim_ascii_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}
