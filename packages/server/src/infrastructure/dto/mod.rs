//! Data transfer objects for the HTTP and WebSocket APIs.

pub mod http;
pub mod websocket;
