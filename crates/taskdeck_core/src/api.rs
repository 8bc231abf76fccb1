//! Query/mutation facade over the todo access layer.
//!
//! # Responsibility
//! - Expose the named external operations (`todos` query; `create_todo`,
//!   `update_todo`, `delete_todo` mutations) over request structs.
//! - Translate access-layer failures into one uniform user-facing error.
//!
//! # Invariants
//! - Optional arguments are explicit `Option` fields, never sentinel values.
//! - Successful results are wrapped unchanged into their payload shapes.
//! - No failure is silently swallowed: expected domain failures surface as
//!   `ApiError` messages, anything else is additionally logged.

use crate::model::todo::{Todo, TodoId};
use crate::repo::todo_repo::{TodoListQuery, TodoRepository};
use crate::service::todo_service::{TodoPatch, TodoService, TodoServiceError};
use log::warn;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DUPLICATE_TITLE_MESSAGE: &str = "A todo with this title already exists.";
const NOT_FOUND_MESSAGE: &str = "Todo not found.";

/// Uniform user-facing error returned by every facade operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Descriptive message safe to show to the caller.
    pub message: String,
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ApiError {}

/// Arguments for the `todos` query. Absent filters impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodosRequest {
    /// Optional exact completion-state filter.
    pub completed: Option<bool>,
    /// Optional case-insensitive substring filter on titles.
    pub search: Option<String>,
    /// Maximum rows to return. `None` returns everything.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    #[serde(default)]
    pub offset: u32,
}

/// Arguments for the `create_todo` mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTodoRequest {
    /// Title of the new todo.
    pub title: String,
    /// Initial completion flag; absent means `false`.
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Arguments for the `update_todo` mutation. Absent fields are left
/// unchanged on the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTodoRequest {
    /// Target todo id.
    pub id: TodoId,
    /// Optional replacement title.
    #[serde(default)]
    pub title: Option<String>,
    /// Optional replacement completion flag.
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Arguments for the `delete_todo` mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTodoRequest {
    /// Target todo id.
    pub id: TodoId,
}

/// Response shape for mutations returning the affected todo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPayload {
    /// The created or updated record.
    pub todo: Todo,
}

/// Response shape for the `delete_todo` mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePayload {
    /// Always `true` on success; failures are reported as `ApiError`.
    pub success: bool,
}

/// Query/mutation facade bound to a repository implementation.
pub struct TodoApi<R: TodoRepository> {
    service: TodoService<R>,
}

impl<R: TodoRepository> TodoApi<R> {
    /// Creates a facade using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self {
            service: TodoService::new(repo),
        }
    }

    /// `todos` query: lists records matching the supplied filters.
    pub fn todos(&self, request: &TodosRequest) -> Result<Vec<Todo>, ApiError> {
        let query = TodoListQuery {
            completed: request.completed,
            search: request.search.clone(),
            limit: request.limit,
            offset: request.offset,
        };

        self.service
            .list_todos(&query)
            .map_err(|err| translate_error("todos", err))
    }

    /// `create_todo` mutation: persists a new record.
    pub fn create_todo(&self, request: &CreateTodoRequest) -> Result<TodoPayload, ApiError> {
        self.service
            .create_todo(request.title.as_str(), request.completed.unwrap_or(false))
            .map(|todo| TodoPayload { todo })
            .map_err(|err| translate_error("create_todo", err))
    }

    /// `update_todo` mutation: applies a partial update to one record.
    pub fn update_todo(&self, request: &UpdateTodoRequest) -> Result<TodoPayload, ApiError> {
        let patch = TodoPatch {
            title: request.title.clone(),
            completed: request.completed,
        };

        self.service
            .update_todo(request.id, &patch)
            .map(|todo| TodoPayload { todo })
            .map_err(|err| translate_error("update_todo", err))
    }

    /// `delete_todo` mutation: permanently removes one record.
    pub fn delete_todo(&self, request: &DeleteTodoRequest) -> Result<DeletePayload, ApiError> {
        self.service
            .delete_todo(request.id)
            .map(|()| DeletePayload { success: true })
            .map_err(|err| translate_error("delete_todo", err))
    }
}

/// Maps an access-layer failure to the uniform caller-facing error.
///
/// Expected domain failures keep their documented messages; anything else is
/// logged with the failing operation before being reported generically.
fn translate_error(operation: &'static str, err: TodoServiceError) -> ApiError {
    let message = match &err {
        TodoServiceError::DuplicateTitle(_) => DUPLICATE_TITLE_MESSAGE.to_string(),
        TodoServiceError::NotFound(_) => NOT_FOUND_MESSAGE.to_string(),
        other => {
            warn!("event=api_error module=api status=error operation={operation} error={other}");
            format!("internal error: {other}")
        }
    };

    ApiError { message }
}
