//! Todo domain model.
//!
//! # Responsibility
//! - Define the canonical todo record shared by repository, service and
//!   facade layers.
//!
//! # Invariants
//! - `id` is stable and never reused for another todo.
//! - `completed` starts as `false` unless explicitly set at creation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a todo record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TodoId = Uuid;

/// A single todo record.
///
/// `title` uniqueness is a create-time contract enforced by the access
/// layer, not by this type; see `TodoService::create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Stable global ID, assigned once at creation.
    pub id: TodoId,
    /// Task title shown to the user.
    pub title: String,
    /// Completion flag.
    pub completed: bool,
}

impl Todo {
    /// Creates a new todo with a generated stable ID.
    pub fn new(title: impl Into<String>, completed: bool) -> Self {
        Self::with_id(Uuid::new_v4(), title, completed)
    }

    /// Creates a todo with a caller-provided stable ID.
    ///
    /// Used by read paths that rehydrate persisted rows.
    pub fn with_id(id: TodoId, title: impl Into<String>, completed: bool) -> Self {
        Self {
            id,
            title: title.into(),
            completed,
        }
    }
}
