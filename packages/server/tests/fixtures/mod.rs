//! Test fixtures shared by the integration tests.
//!
//! Starts the real router in-process on an ephemeral port.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use tokio::{net::TcpListener, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use yoriai_server::{
    build_router,
    infrastructure::repository::{InMemoryPresenceRepository, InMemoryUserRepository},
    ui::state::AppState,
};

/// A running server; shut down when dropped
pub struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    _handle: JoinHandle<()>,
}

#[allow(dead_code)]
impl TestServer {
    /// Start a server without an idle timeout
    pub async fn start() -> Self {
        Self::start_with_idle_timeout(None).await
    }

    /// Start a server whose chat connections time out after `idle_timeout`
    pub async fn start_with_idle_timeout(idle_timeout: Option<Duration>) -> Self {
        let shutdown = CancellationToken::new();
        let state = Arc::new(AppState::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPresenceRepository::new()),
            idle_timeout,
            shutdown.clone(),
        ));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        let token = shutdown.clone();
        let handle = tokio::spawn(async move {
            axum::serve(listener, build_router(state))
                .with_graceful_shutdown(async move { token.cancelled().await })
                .await
                .expect("Test server failed");
        });

        Self {
            addr,
            shutdown,
            _handle: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
