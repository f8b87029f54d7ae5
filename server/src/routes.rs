//! REST endpoints over `TodoService`.
//!
//! Handlers only extract, dispatch, and map errors to status codes:
//! validation 422, not found 404, store unavailable 503, malformed body 400
//! (or whatever status axum's rejection carries). Swagger UI is served at
//! `/docs` over the generated OpenAPI document.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::doc::ApiDoc;
use crate::error::TodoError;
use crate::model::{FieldError, NewTodo, Todo, TodoId, TodoPatch};
use crate::service::TodoService;

pub const DOCS_PATH: &str = "/docs";
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Error envelope returned for every non-2xx response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    #[schema(value_type = String, example = "not_found")]
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<FieldError>>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::Validation(validation) => ApiError {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                code: "validation_failed",
                message: validation.to_string(),
                details: Some(validation.errors().to_vec()),
            },
            TodoError::NotFound(id) => ApiError {
                status: StatusCode::NOT_FOUND,
                code: "not_found",
                message: format!("Todo with id {id} not found"),
                details: None,
            },
            TodoError::StoreUnavailable(store) => {
                error!(error = %store, "store failure");
                ApiError {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    code: "store_unavailable",
                    message: "todo store is unavailable".to_string(),
                    details: None,
                }
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Well-formed JSON with a wrongly typed field shares 422 with validation.
        let code = match &rejection {
            JsonRejection::JsonDataError(_) => "validation_failed",
            _ => "bad_request",
        };
        ApiError {
            status: rejection.status(),
            code,
            message: rejection.body_text(),
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

pub fn router(service: TodoService) -> Router {
    let todos = Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).patch(update_todo).delete(delete_todo),
        );

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api", todos)
        .with_state(service)
        .merge(SwaggerUi::new(DOCS_PATH).url(OPENAPI_PATH, ApiDoc::openapi()))
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Todo App API",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": DOCS_PATH,
    }))
}

/// Report whether the backing store answers.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service and store are reachable"),
        (status = 503, description = "Store is unreachable")
    )
)]
pub async fn health(State(service): State<TodoService>) -> (StatusCode, Json<Value>) {
    if service.store_reachable().await {
        (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "store": "connected" })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unhealthy", "store": "disconnected" })),
        )
    }
}

/// List every todo in store order.
#[utoipa::path(
    get,
    path = "/api/todos",
    tag = "todos",
    responses(
        (status = 200, description = "All todos", body = [Todo]),
        (status = 503, description = "Store unavailable", body = ApiError)
    )
)]
pub async fn list_todos(State(service): State<TodoService>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(service.list().await?))
}

/// Create a todo. `completed` defaults to false and `priority` to medium.
#[utoipa::path(
    post,
    path = "/api/todos",
    tag = "todos",
    request_body = NewTodo,
    responses(
        (status = 201, description = "Created todo", body = Todo),
        (status = 400, description = "Malformed body", body = ApiError),
        (status = 422, description = "Validation failed", body = ApiError),
        (status = 503, description = "Store unavailable", body = ApiError)
    )
)]
pub async fn create_todo(
    State(service): State<TodoService>,
    input: Result<Json<NewTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let Json(input) = input?;
    let todo = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// Fetch one todo.
#[utoipa::path(
    get,
    path = "/api/todos/{id}",
    tag = "todos",
    params(("id" = String, Path, description = "Todo id")),
    responses(
        (status = 200, description = "The todo", body = Todo),
        (status = 404, description = "No todo with that id", body = ApiError),
        (status = 503, description = "Store unavailable", body = ApiError)
    )
)]
pub async fn get_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    Ok(Json(service.get(&TodoId::from(id)).await?))
}

/// Apply a partial update. Omitted fields are left untouched and
/// `description: null` clears the description.
#[utoipa::path(
    patch,
    path = "/api/todos/{id}",
    tag = "todos",
    params(("id" = String, Path, description = "Todo id")),
    request_body = TodoPatch,
    responses(
        (status = 200, description = "Updated todo", body = Todo),
        (status = 404, description = "No todo with that id", body = ApiError),
        (status = 422, description = "Validation failed", body = ApiError),
        (status = 503, description = "Store unavailable", body = ApiError)
    )
)]
pub async fn update_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
    input: Result<Json<TodoPatch>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Json(patch) = input?;
    Ok(Json(service.update(&TodoId::from(id), patch).await?))
}

/// Delete a todo permanently.
#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    tag = "todos",
    params(("id" = String, Path, description = "Todo id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No todo with that id", body = ApiError),
        (status = 503, description = "Store unavailable", body = ApiError)
    )
)]
pub async fn delete_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.delete(&TodoId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
