//! HTTP server that binds the JSON-RPC router to a TCP socket.
//!
//! The router is built from an explicit [`AppState`]; there is no
//! process-wide routing table, so several servers can coexist in one
//! process.

mod router;

use std::net::SocketAddr;
use std::sync::Arc;

use jrpc_dispatch::RpcHandler;
use tokio::net::TcpListener;

pub use router::{build_router, AppState};

/// Errors that can occur in the HTTP transport.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    /// Failed to bind to the TCP address.
    #[error("failed to bind on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP server stopped with an I/O error.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Axum-based HTTP server for the JSON-RPC endpoint.
pub struct HttpServer {
    addr: SocketAddr,
    state: AppState,
}

impl HttpServer {
    pub fn new(handler: Arc<RpcHandler>, addr: SocketAddr) -> Self {
        Self {
            addr,
            state: AppState { handler },
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Bind and serve until Ctrl-C.
    pub async fn run(self) -> Result<(), ServeError> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|source| ServeError::Bind {
                addr: self.addr,
                source,
            })?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` completes.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServeError>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let local = listener.local_addr().unwrap_or(self.addr);
        tracing::info!(
            addr = %local,
            methods = self.state.handler.registry().len(),
            "JSON-RPC server ready"
        );

        axum::serve(listener, build_router(self.state))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(ServeError::Serve)?;

        tracing::info!("JSON-RPC server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jrpc_dispatch::{DispatchConfig, RegistryBuilder};

    fn make_handler() -> Arc<RpcHandler> {
        Arc::new(RpcHandler::new(RegistryBuilder::new().build(), DispatchConfig::default()))
    }

    #[test]
    fn new_keeps_address() {
        let addr: SocketAddr = "127.0.0.1:3000".parse().unwrap();
        let server = HttpServer::new(make_handler(), addr);
        assert_eq!(server.addr().port(), 3000);
    }

    #[test]
    fn bind_error_displays_address() {
        let err = ServeError::Bind {
            addr: "127.0.0.1:8080".parse().unwrap(),
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        };
        assert!(err.to_string().contains("127.0.0.1:8080"));
    }

    #[tokio::test]
    async fn serve_stops_on_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server = HttpServer::new(make_handler(), listener.local_addr().unwrap());
        server.serve(listener, async {}).await.unwrap();
    }
}
