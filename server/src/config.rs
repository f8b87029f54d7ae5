//! Command-line and environment configuration for the server binary.

use std::time::Duration;

use clap::{Parser, ValueEnum};

/// Which `TodoStore` backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackend {
    /// Redis at `--redis-url`.
    Redis,
    /// Process-local map; contents are lost on exit.
    Memory,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "todo-server", version, about = "REST API for todo lists")]
pub struct ServerConfig {
    /// Address to listen on.
    #[arg(long, env = "TODO_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    #[arg(long, env = "TODO_STORE", value_enum, default_value_t = StoreBackend::Redis)]
    pub store: StoreBackend,

    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1:6379/0")]
    pub redis_url: String,

    /// Seconds to wait for a Redis connection before failing the request.
    #[arg(long, env = "TODO_REDIS_TIMEOUT_SECS", default_value_t = 5)]
    pub redis_timeout_secs: u64,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, env = "TODO_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn redis_timeout(&self) -> Duration {
        Duration::from_secs(self.redis_timeout_secs)
    }
}
