//! Shared application state.

use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::domain::{PresenceRepository, UserRepository};

/// Shared application state
pub struct AppState {
    /// User registry storage
    pub users: Arc<dyn UserRepository>,
    /// Presence table shared by every chat connection
    pub presence: Arc<dyn PresenceRepository>,
    /// Receive timeout for chat connections; `None` waits forever
    pub idle_timeout: Option<Duration>,
    /// Cancelled on server shutdown; each chat connection runs on a child token
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        presence: Arc<dyn PresenceRepository>,
        idle_timeout: Option<Duration>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            users,
            presence,
            idle_timeout,
            shutdown,
        }
    }
}
