//! Axum router for the JSON-RPC HTTP transport.
//!
//! Every path and every HTTP method reaches the dispatcher. The response is
//! always `200 OK` with a JSON body; RPC failures live in the body.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use jrpc_dispatch::RpcHandler;
use jrpc_protocol::{RpcError, RpcReply};

/// Shared state threaded through the handler.
#[derive(Clone)]
pub struct AppState {
    /// The request dispatcher.
    pub handler: Arc<RpcHandler>,
}

/// Builds the router with the single catch-all endpoint.
///
/// The body is buffered up to the handler's `max_body_bytes`; reading stops
/// as soon as a body grows past it.
pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.handler.config().max_body_bytes;
    let limit = usize::try_from(max_body_bytes).unwrap_or(usize::MAX);

    Router::new()
        .fallback(handle_rpc)
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}

async fn handle_rpc(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "failed to read request body");
            let err = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                RpcError::body_limit_exceeded(state.handler.config().max_body_bytes)
            } else {
                RpcError::invalid_request(format!(
                    "failed to read request: {}",
                    rejection.body_text()
                ))
            };
            return json_body(RpcReply::Error(err).to_bytes());
        }
    };

    let handler = Arc::clone(&state.handler);
    let encoded = match tokio::task::spawn_blocking(move || handler.handle(&body)).await {
        Ok(encoded) => encoded,
        Err(e) => {
            tracing::error!(error = %e, "dispatch task failed");
            RpcReply::Error(RpcError::internal_error("dispatch task failed")).to_bytes()
        }
    };

    json_body(encoded)
}

fn json_body(body: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}
