//! HTTP listener.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::error::ServerResult;
use crate::signals::ShutdownHandle;

/// A bound HTTP listener serving the API router.
pub struct HttpServer {
    listener: TcpListener,
    router: Router,
}

impl HttpServer {
    /// Binds to `addr`.
    pub async fn bind(addr: SocketAddr, router: Router) -> ServerResult<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "HTTP server listening");
        Ok(Self { listener, router })
    }

    pub fn local_addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves until `shutdown` fires, then drains in-flight requests.
    pub async fn run(self, shutdown: ShutdownHandle) -> ServerResult<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;
        info!("HTTP server stopped");
        Ok(())
    }
}
