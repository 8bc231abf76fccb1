//! Todo access layer.
//!
//! # Responsibility
//! - Provide list/create/update/delete use-case APIs over the storage port.
//! - Own the create-time title-uniqueness contract.
//!
//! # Invariants
//! - `create_todo` never writes when an exact title match already exists.
//! - `update_todo` writes the row back only when `completed` is supplied;
//!   a title-only update mutates the returned record without persisting it.
//! - An empty list result is `Ok`, never an error.

use crate::model::todo::{Todo, TodoId};
use crate::repo::todo_repo::{RepoError, TodoListQuery, TodoRepository};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Access-layer error for todo use-cases.
#[derive(Debug)]
pub enum TodoServiceError {
    /// A todo with this exact title already exists.
    DuplicateTitle(String),
    /// Target todo does not exist.
    NotFound(TodoId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateTitle(title) => write!(f, "duplicate todo title: `{title}`"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent todo state: {details}"),
        }
    }
}

impl Error for TodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TodoServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Partial-update request. Absent fields leave the record unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    /// Optional replacement title.
    pub title: Option<String>,
    /// Optional replacement completion flag.
    pub completed: Option<bool>,
}

/// Todo use-case service over a repository implementation.
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists todos matching the query filters, AND-combined.
    pub fn list_todos(&self, query: &TodoListQuery) -> Result<Vec<Todo>, TodoServiceError> {
        Ok(self.repo.list_todos(query)?)
    }

    /// Creates one todo after probing for an exact title duplicate.
    ///
    /// # Contract
    /// - Duplicate title check is exact and case-sensitive.
    /// - On duplicate, no write is performed.
    pub fn create_todo(
        &self,
        title: impl Into<String>,
        completed: bool,
    ) -> Result<Todo, TodoServiceError> {
        let title = title.into();
        if self.repo.title_exists(title.as_str())? {
            return Err(TodoServiceError::DuplicateTitle(title));
        }

        let id = self.repo.insert_todo(&Todo::new(title, completed))?;
        self.repo
            .get_todo(id)?
            .ok_or(TodoServiceError::InconsistentState(
                "created todo not found in read-back",
            ))
    }

    /// Applies a partial update to one todo.
    ///
    /// # Contract
    /// - A supplied `title` is assigned to the returned record.
    /// - The row is written back only when `completed` is supplied; the
    ///   returned record may therefore carry an unpersisted title change.
    pub fn update_todo(
        &self,
        id: TodoId,
        request: &TodoPatch,
    ) -> Result<Todo, TodoServiceError> {
        let mut todo = self
            .repo
            .get_todo(id)?
            .ok_or(TodoServiceError::NotFound(id))?;

        if let Some(title) = request.title.as_deref() {
            todo.title = title.to_string();
        }

        if let Some(completed) = request.completed {
            todo.completed = completed;
            self.repo.update_todo(&todo)?;
        }

        Ok(todo)
    }

    /// Permanently deletes one todo by id.
    pub fn delete_todo(&self, id: TodoId) -> Result<(), TodoServiceError> {
        Ok(self.repo.delete_todo(id)?)
    }
}
