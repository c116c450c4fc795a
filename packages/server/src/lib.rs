//! Yoriai server library.
//!
//! A user registry and a live chat room served over HTTP and WebSocket,
//! organized in layers:
//!
//! - `domain`: entities, value objects and repository traits
//! - `infrastructure`: DTOs and in-memory repositories
//! - `usecase`: the chat broadcast engine and the registry operations
//! - `ui`: axum router, handlers and the server runner

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use ui::{build_router, run};
