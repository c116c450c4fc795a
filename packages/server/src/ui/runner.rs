//! Server entry point.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::{
    config::ServerConfig,
    error::ServerError,
    infrastructure::repository::{InMemoryPresenceRepository, InMemoryUserRepository},
};

use super::{router::build_router, signal::shutdown_signal, state::AppState};

/// Bind the listener and serve until a shutdown signal arrives.
///
/// On shutdown the listener stops accepting and every chat connection is
/// cancelled through the shared shutdown token.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let shutdown = CancellationToken::new();
    let state = Arc::new(AppState::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryPresenceRepository::new()),
        config.idle_timeout(),
        shutdown.clone(),
    ));

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!(
        addr = %addr,
        idle_timeout = ?config.idle_timeout(),
        "Yoriai server listening"
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            shutdown.cancel();
        })
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("Server stopped");
    Ok(())
}
