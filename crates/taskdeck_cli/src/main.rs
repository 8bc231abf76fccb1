//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taskdeck_core` wiring.
//! - Drive every facade operation once; output is deterministic in the
//!   default in-memory mode.

use std::error::Error;
use taskdeck_core::db::{open_db, open_db_in_memory};
use taskdeck_core::{
    CreateTodoRequest, DeleteTodoRequest, SqliteTodoRepository, Todo, TodoApi, TodosRequest,
    UpdateTodoRequest,
};

fn main() {
    if let Err(err) = run() {
        eprintln!("taskdeck smoke run failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    println!("taskdeck version={}", taskdeck_core::core_version());

    // TASKDECK_DB selects a database file; unset means in-memory.
    let conn = match std::env::var_os("TASKDECK_DB") {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let api = TodoApi::new(SqliteTodoRepository::try_new(&conn)?);

    let created = api.create_todo(&CreateTodoRequest {
        title: "Buy milk".to_string(),
        completed: None,
    })?;
    println!(
        "created: title={} completed={}",
        created.todo.title, created.todo.completed
    );

    match api.create_todo(&CreateTodoRequest {
        title: "Buy milk".to_string(),
        completed: None,
    }) {
        Ok(_) => println!("duplicate create unexpectedly succeeded"),
        Err(err) => println!("duplicate create rejected: {err}"),
    }

    api.create_todo(&CreateTodoRequest {
        title: "Clean house".to_string(),
        completed: Some(true),
    })?;

    let all = api.todos(&TodosRequest::default())?;
    println!("todos: {}", summarize(&all));

    let done = api.todos(&TodosRequest {
        completed: Some(true),
        ..TodosRequest::default()
    })?;
    println!("todos completed=true: {}", summarize(&done));

    let milk = api.todos(&TodosRequest {
        search: Some("MILK".to_string()),
        ..TodosRequest::default()
    })?;
    println!("todos search=MILK: {}", summarize(&milk));

    let updated = api.update_todo(&UpdateTodoRequest {
        id: created.todo.id,
        title: None,
        completed: Some(true),
    })?;
    println!(
        "updated: title={} completed={}",
        updated.todo.title, updated.todo.completed
    );

    let deleted = api.delete_todo(&DeleteTodoRequest {
        id: created.todo.id,
    })?;
    println!("deleted: success={}", deleted.success);

    match api.delete_todo(&DeleteTodoRequest {
        id: created.todo.id,
    }) {
        Ok(_) => println!("second delete unexpectedly succeeded"),
        Err(err) => println!("second delete rejected: {err}"),
    }

    Ok(())
}

fn summarize(todos: &[Todo]) -> String {
    let titles: Vec<&str> = todos.iter().map(|todo| todo.title.as_str()).collect();
    format!("count={} titles=[{}]", todos.len(), titles.join(", "))
}
