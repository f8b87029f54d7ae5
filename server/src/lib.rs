//! Todo list REST service.
//!
//! # Overview
//! `model` defines the record and validates request payloads, `service`
//! owns the lifecycle rules, `store` persists records (Redis or in-memory),
//! and `routes` maps HTTP onto the service. `doc` describes the routes as
//! an OpenAPI document.

pub mod config;
pub mod doc;
pub mod error;
pub mod model;
pub mod routes;
pub mod service;
pub mod store;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::{RunError, StoreError, TodoError};
pub use model::{NewTodo, Patch, Priority, Todo, TodoId, TodoPatch};
pub use service::TodoService;

/// Full application router: REST routes plus CORS and request tracing.
pub fn app(service: TodoService) -> Router {
    routes::router(service)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve `service` on `listener` until Ctrl-C.
pub async fn run(listener: TcpListener, service: TodoService) -> Result<(), RunError> {
    axum::serve(listener, app(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(RunError::Serve)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
