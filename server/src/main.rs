use std::sync::Arc;

use clap::Parser;
use mockable::DefaultClock;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use todo_server::config::{ServerConfig, StoreBackend};
use todo_server::store::{MemoryStore, RedisStore, TodoStore};
use todo_server::{RunError, TodoService};

#[tokio::main]
async fn main() -> Result<(), RunError> {
    let config = ServerConfig::parse();
    init_tracing(&config.log_level);

    let store: Arc<dyn TodoStore> = match config.store {
        StoreBackend::Memory => {
            warn!("using in-memory store; todos are lost on exit");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Redis => {
            Arc::new(RedisStore::connect(&config.redis_url, config.redis_timeout()).await?)
        }
    };
    let service = TodoService::new(store, Arc::new(DefaultClock));
    if service.store_reachable().await {
        info!(store = ?config.store, "store connection ok");
    } else {
        warn!(store = ?config.store, "store unreachable at startup; serving anyway");
    }

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| RunError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!("listening on {addr}");
    todo_server::run(listener, service).await
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "todo_server={log_level},tower_http={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
