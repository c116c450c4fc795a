//! Yoriai server: user registry HTTP API and WebSocket chat room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin yoriai-server -- --port 8080
//! ```

use clap::Parser;
use yoriai_server::ServerConfig;
use yoriai_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    // Run the server
    if let Err(e) = yoriai_server::run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
