use taskdeck_core::db::open_db_in_memory;
use taskdeck_core::{
    SqliteTodoRepository, TodoListQuery, TodoPatch, TodoRepository, TodoService, TodoServiceError,
};
use uuid::Uuid;

#[test]
fn create_persists_record_with_requested_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    let created = service.create_todo("Buy milk", false).unwrap();
    assert_eq!(created.title, "Buy milk");
    assert!(!created.completed);

    let verify = SqliteTodoRepository::try_new(&conn).unwrap();
    let stored = verify.get_todo(created.id).unwrap().unwrap();
    assert_eq!(stored, created);
}

#[test]
fn create_duplicate_title_fails_and_leaves_store_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    service.create_todo("Buy milk", false).unwrap();
    let err = service.create_todo("Buy milk", true).unwrap_err();
    assert!(matches!(err, TodoServiceError::DuplicateTitle(title) if title == "Buy milk"));

    let verify = SqliteTodoRepository::try_new(&conn).unwrap();
    let all = verify.list_todos(&TodoListQuery::default()).unwrap();
    assert_eq!(all.len(), 1);
    assert!(!all[0].completed);
}

#[test]
fn duplicate_check_is_case_sensitive() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    service.create_todo("Buy milk", false).unwrap();
    let shouted = service.create_todo("BUY MILK", false).unwrap();
    assert_eq!(shouted.title, "BUY MILK");
}

#[test]
fn update_with_completed_persists_the_flag() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    let created = service.create_todo("Walk dog", false).unwrap();
    let patch = TodoPatch {
        completed: Some(true),
        ..TodoPatch::default()
    };
    let updated = service.update_todo(created.id, &patch).unwrap();
    assert!(updated.completed);

    let verify = SqliteTodoRepository::try_new(&conn).unwrap();
    assert!(verify.get_todo(created.id).unwrap().unwrap().completed);
}

#[test]
fn update_with_both_fields_persists_both() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    let created = service.create_todo("Walk dog", false).unwrap();
    let patch = TodoPatch {
        title: Some("Walk the dog".to_string()),
        completed: Some(true),
    };
    let updated = service.update_todo(created.id, &patch).unwrap();
    assert_eq!(updated.title, "Walk the dog");
    assert!(updated.completed);

    let verify = SqliteTodoRepository::try_new(&conn).unwrap();
    let stored = verify.get_todo(created.id).unwrap().unwrap();
    assert_eq!(stored.title, "Walk the dog");
    assert!(stored.completed);
}

#[test]
fn title_only_update_is_returned_but_not_persisted() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    let created = service.create_todo("Walk dog", false).unwrap();
    let patch = TodoPatch {
        title: Some("Walk cat".to_string()),
        ..TodoPatch::default()
    };
    let returned = service.update_todo(created.id, &patch).unwrap();
    assert_eq!(returned.title, "Walk cat");

    // The row is only written back when `completed` is supplied.
    let verify = SqliteTodoRepository::try_new(&conn).unwrap();
    let stored = verify.get_todo(created.id).unwrap().unwrap();
    assert_eq!(stored.title, "Walk dog");
}

#[test]
fn empty_patch_returns_record_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    let created = service.create_todo("Walk dog", true).unwrap();
    let returned = service
        .update_todo(created.id, &TodoPatch::default())
        .unwrap();
    assert_eq!(returned, created);
}

#[test]
fn update_unknown_id_returns_not_found_and_leaves_store_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    service.create_todo("only row", false).unwrap();

    let missing = Uuid::new_v4();
    let patch = TodoPatch {
        completed: Some(true),
        ..TodoPatch::default()
    };
    let err = service.update_todo(missing, &patch).unwrap_err();
    assert!(matches!(err, TodoServiceError::NotFound(id) if id == missing));

    let verify = SqliteTodoRepository::try_new(&conn).unwrap();
    let all = verify.list_todos(&TodoListQuery::default()).unwrap();
    assert_eq!(all.len(), 1);
    assert!(!all[0].completed);
}

#[test]
fn delete_succeeds_once_then_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    let created = service.create_todo("short lived", false).unwrap();

    service.delete_todo(created.id).unwrap();
    let err = service.delete_todo(created.id).unwrap_err();
    assert!(matches!(err, TodoServiceError::NotFound(id) if id == created.id));
}

#[test]
fn delete_unknown_id_leaves_store_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    service.create_todo("only row", false).unwrap();

    let err = service.delete_todo(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, TodoServiceError::NotFound(_)));

    let verify = SqliteTodoRepository::try_new(&conn).unwrap();
    assert_eq!(verify.list_todos(&TodoListQuery::default()).unwrap().len(), 1);
}

#[test]
fn list_with_completed_filter_returns_exactly_the_matching_record() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    service.create_todo("Buy milk", false).unwrap();
    let done = service.create_todo("Clean house", true).unwrap();

    let query = TodoListQuery {
        completed: Some(true),
        ..TodoListQuery::default()
    };
    let hits = service.list_todos(&query).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0], done);
}
