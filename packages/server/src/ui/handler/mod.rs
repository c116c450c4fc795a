//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{
    create_user, delete_user, get_presence, get_user, health_check, list_users, update_user,
};

// Re-export WebSocket handlers
pub use websocket::websocket_handler;
