//! OpenAPI document for the REST API, served by Swagger UI at `/docs`.

use utoipa::OpenApi;

use crate::model::{FieldError, NewTodo, Priority, Todo, TodoId, TodoPatch};
use crate::routes::ApiError;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todo App API",
        description = "Create, list, update and delete todo items."
    ),
    paths(
        crate::routes::list_todos,
        crate::routes::create_todo,
        crate::routes::get_todo,
        crate::routes::update_todo,
        crate::routes::delete_todo,
        crate::routes::health,
    ),
    components(schemas(Todo, TodoId, Priority, NewTodo, TodoPatch, ApiError, FieldError)),
    tags(
        (name = "todos", description = "Todo item lifecycle"),
        (name = "health", description = "Store reachability")
    )
)]
pub struct ApiDoc;
