//! Server configuration (command line flags and environment variables).

use std::time::Duration;

use clap::Parser;

/// Yoriai server configuration
#[derive(Debug, Clone, Parser)]
#[command(name = "yoriai-server", version, about = "User registry and live chat room server")]
pub struct ServerConfig {
    /// Host address to bind to
    #[arg(long, env = "YORIAI_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "YORIAI_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Close chat connections that send nothing for this many seconds
    #[arg(long, env = "YORIAI_IDLE_TIMEOUT_SECS")]
    pub idle_timeout_secs: Option<u64>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "YORIAI_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    /// `host:port` to bind the listener to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Idle timeout for chat connections; `0` disables it like an absent flag
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}
