//! Synchronous client core for the todo service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), then turns fetched lists
//! into display-ready views.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `view` derives the active/completed partitions and priority order.
//! - `state::TodoListState` is the single authoritative list snapshot,
//!   changed only through reducer-style `Action`s.
//! - DTOs are defined independently from the server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod state;
pub mod types;
pub mod view;

pub use client::TodoClient;
pub use error::ApiError;
pub use crate::http::{HttpMethod, HttpRequest, HttpResponse};
pub use state::{Action, LoadStatus, TodoListState};
pub use types::{CreateTodo, Priority, Todo, UpdateTodo};
pub use view::{build_view, Section, TodoView};
