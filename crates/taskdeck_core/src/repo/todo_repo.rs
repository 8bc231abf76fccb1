//! Todo repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over canonical `todos` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `title` matching in `title_exists` is exact and case-sensitive.
//! - `search` filtering is case-insensitive substring match with `LIKE`
//!   metacharacters escaped, so user input always matches literally.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::todo::{Todo, TodoId};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TODO_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    completed
FROM todos";

const REQUIRED_COLUMNS: &[&str] = &["uuid", "title", "completed", "created_at", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for todo persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(TodoId),
    InvalidData(String),
    /// The connection was never migrated (or only partially migrated).
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection not migrated: schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Filter options for listing todos. Absent fields impose no constraint;
/// present fields are AND-combined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoListQuery {
    /// Optional exact completion-state filter.
    pub completed: Option<bool>,
    /// Optional case-insensitive substring filter on `title`.
    pub search: Option<String>,
    /// Maximum rows to return. `None` returns everything.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

/// Repository interface for todo CRUD operations.
///
/// This is the storage port the access layer depends on; swapping the
/// persistence engine means providing another implementation of this trait.
pub trait TodoRepository {
    /// Persists one todo row and returns its stable id.
    fn insert_todo(&self, todo: &Todo) -> RepoResult<TodoId>;
    /// Gets one todo by id.
    fn get_todo(&self, id: TodoId) -> RepoResult<Option<Todo>>;
    /// Lists todos matching the query filters.
    fn list_todos(&self, query: &TodoListQuery) -> RepoResult<Vec<Todo>>;
    /// Writes back the full row for an existing todo.
    fn update_todo(&self, todo: &Todo) -> RepoResult<()>;
    /// Permanently removes one todo by id.
    fn delete_todo(&self, id: TodoId) -> RepoResult<()>;
    /// Returns whether any row carries exactly this title.
    fn title_exists(&self, title: &str) -> RepoResult<bool>;
}

/// SQLite-backed todo repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn insert_todo(&self, todo: &Todo) -> RepoResult<TodoId> {
        self.conn.execute(
            "INSERT INTO todos (uuid, title, completed) VALUES (?1, ?2, ?3);",
            params![
                todo.id.to_string(),
                todo.title.as_str(),
                bool_to_int(todo.completed),
            ],
        )?;

        Ok(todo.id)
    }

    fn get_todo(&self, id: TodoId) -> RepoResult<Option<Todo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }

        Ok(None)
    }

    fn list_todos(&self, query: &TodoListQuery) -> RepoResult<Vec<Todo>> {
        let mut sql = format!("{TODO_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(completed) = query.completed {
            sql.push_str(" AND completed = ?");
            bind_values.push(Value::Integer(bool_to_int(completed)));
        }

        if let Some(search) = query.search.as_deref() {
            sql.push_str(" AND title LIKE ? ESCAPE '\\'");
            bind_values.push(Value::Text(like_contains_pattern(search)));
        }

        sql.push_str(" ORDER BY created_at ASC, uuid ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut todos = Vec::new();

        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }

        Ok(todos)
    }

    fn update_todo(&self, todo: &Todo) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE todos
             SET
                title = ?1,
                completed = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?3;",
            params![
                todo.title.as_str(),
                bool_to_int(todo.completed),
                todo.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(todo.id));
        }

        Ok(())
    }

    fn delete_todo(&self, id: TodoId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM todos WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn title_exists(&self, title: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM todos WHERE title = ?1);",
            [title],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

/// Builds a `%term%` LIKE pattern with `%`, `_` and the escape character
/// quoted, so the filter term always matches literally.
pub fn like_contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<Todo> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in todos.uuid"))
    })?;

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in todos.completed"
            )));
        }
    };

    Ok(Todo {
        id,
        title: row.get("title")?,
        completed,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;

    if actual_version > expected_version {
        return Err(RepoError::Db(DbError::UnsupportedSchemaVersion {
            db_version: actual_version,
            latest_supported: expected_version,
        }));
    }

    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "todos")? {
        return Err(RepoError::MissingRequiredTable("todos"));
    }

    for &column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "todos", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "todos",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::like_contains_pattern;

    #[test]
    fn pattern_wraps_term_in_wildcards() {
        assert_eq!(like_contains_pattern("milk"), "%milk%");
    }

    #[test]
    fn pattern_escapes_like_metacharacters() {
        assert_eq!(like_contains_pattern("50%_a\\b"), "%50\\%\\_a\\\\b%");
    }

    #[test]
    fn pattern_for_empty_term_matches_everything() {
        assert_eq!(like_contains_pattern(""), "%%");
    }
}
