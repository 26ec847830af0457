use student_records_core::{RecordError, RecordService, StoreConfig};
use tempfile::TempDir;

fn service() -> (TempDir, RecordService) {
    let dir = tempfile::tempdir().unwrap();
    let service = RecordService::new(StoreConfig::new(dir.path().join("students.db")));
    (dir, service)
}

#[test]
fn insert_then_list_adds_exactly_one_record() {
    let (_dir, service) = service();
    service.insert("Bob", "Physics", "222").unwrap();
    let before = service.list_all().unwrap();

    let id = service.insert("Ann", "Math", "5551234").unwrap();
    let after = service.list_all().unwrap();

    assert_eq!(after.len(), before.len() + 1);
    let added: Vec<_> = after
        .iter()
        .filter(|student| !before.contains(student))
        .collect();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].id, id);
    assert_eq!(
        (added[0].name.as_str(), added[0].course.as_str(), added[0].phone),
        ("Ann", "Math", Some(5_551_234))
    );
    assert!(before.iter().all(|student| student.id != id));
}

#[test]
fn ann_scenario_lists_row_then_deletes_it() {
    let (_dir, service) = service();

    let id = service.insert("Ann", "Math", "5551234").unwrap();
    let rows: Vec<[String; 4]> = service
        .list_all()
        .unwrap()
        .iter()
        .map(|student| student.to_row())
        .collect();
    assert!(rows.contains(&[
        id.to_string(),
        "Ann".to_string(),
        "Math".to_string(),
        "5551234".to_string(),
    ]));

    assert_eq!(service.delete(id).unwrap(), 1);
    assert!(service.list_all().unwrap().iter().all(|s| s.id != id));
}

#[test]
fn delete_twice_is_a_successful_noop() {
    let (_dir, service) = service();
    let id = service.insert("Ann", "Math", "5551234").unwrap();

    assert_eq!(service.delete(id).unwrap(), 1);
    assert_eq!(service.delete(id).unwrap(), 0);
    assert!(service.get(id).unwrap().is_none());
}

#[test]
fn update_then_get_returns_new_values() {
    let (_dir, service) = service();
    let id = service.insert("Ann", "Math", "5551234").unwrap();

    assert_eq!(service.update(id, "Ann B", "Biology", " 0 ").unwrap(), 1);

    let loaded = service.get(id).unwrap().unwrap();
    assert_eq!(loaded.name, "Ann B");
    assert_eq!(loaded.course, "Biology");
    assert_eq!(loaded.phone, Some(0));
}

#[test]
fn update_of_missing_id_succeeds_with_zero_rows() {
    let (_dir, service) = service();
    service.insert("Ann", "Math", "5551234").unwrap();

    assert_eq!(service.update(4_242, "X", "Math", "1").unwrap(), 0);
    assert_eq!(service.list_all().unwrap().len(), 1);
}

#[test]
fn search_by_name_returns_exactly_matching_records() {
    let (_dir, service) = service();
    service.insert("Alice", "Math", "1").unwrap();
    service.insert("Alice", "History", "2").unwrap();
    service.insert("Alicia", "Math", "3").unwrap();

    let found = service.search(Some("Alice"), None, None).unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|student| student.name == "Alice"));
}

#[test]
fn insert_then_search_all_fields_roundtrips() {
    let (_dir, service) = service();
    service.insert("Ann", "Math", "1").unwrap();
    let id = service.insert("Ann", "Math", "5551234").unwrap();

    let found = service
        .search(Some("Ann"), Some("Math"), Some("5551234"))
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, id);
}

#[test]
fn search_without_fields_is_query_malformed() {
    let (_dir, service) = service();
    service.insert("Ann", "Math", "5551234").unwrap();

    let err = service.search(None, None, None).unwrap_err();
    assert!(matches!(err, RecordError::QueryMalformed(_)));
    assert_eq!(err.code(), "query_malformed");
}

#[test]
fn non_numeric_phone_is_invalid_input_and_touches_nothing() {
    let (dir, service) = service();

    let err = service.insert("Ann", "Math", "555-1234").unwrap_err();
    assert!(matches!(err, RecordError::InvalidInput(_)));
    assert!(!dir.path().join("students.db").exists());

    let id = service.insert("Ann", "Math", "5551234").unwrap();
    let err = service.update(id, "Changed", "Physics", "n/a").unwrap_err();
    assert!(matches!(err, RecordError::InvalidInput(_)));
    assert_eq!(service.get(id).unwrap().unwrap().name, "Ann");

    let err = service.search(Some("Ann"), None, Some("abc")).unwrap_err();
    assert!(matches!(err, RecordError::InvalidInput(_)));
}

#[test]
fn unopenable_store_is_storage_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let service = RecordService::new(StoreConfig::new(
        dir.path().join("missing").join("students.db"),
    ));

    let err = service.list_all().unwrap_err();
    assert!(matches!(err, RecordError::StorageUnavailable(_)));
    assert_eq!(err.code(), "storage_unavailable");
}

#[test]
fn newer_schema_is_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.db");
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 7;").unwrap();
    drop(conn);

    let service = RecordService::new(StoreConfig::new(&path));
    let err = service.insert("Ann", "Math", "1").unwrap_err();
    assert!(matches!(err, RecordError::Storage(_)));
}

#[test]
fn legacy_rows_with_null_phone_still_list() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.db");
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE students (id INTEGER PRIMARY KEY, name TEXT, course TEXT, mobile INTEGER);
         INSERT INTO students (name, course, mobile) VALUES ('Ann', 'Math', 5551234);
         INSERT INTO students (name, course, mobile) VALUES ('Bob', 'Physics', NULL);",
    )
    .unwrap();
    drop(conn);

    let service = RecordService::new(StoreConfig::new(&path));
    let rows: Vec<[String; 4]> = service
        .list_all()
        .unwrap()
        .iter()
        .map(|student| student.to_row())
        .collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][1..], ["Ann", "Math", "5551234"]);
    assert_eq!(rows[1][1..], ["Bob", "Physics", ""]);

    let bob = service.search(Some("Bob"), None, None).unwrap();
    assert_eq!(bob.len(), 1);
    assert_eq!(bob[0].phone, None);

    assert_eq!(service.update(bob[0].id, "Bob", "Physics", "0").unwrap(), 1);
    assert_eq!(service.get(bob[0].id).unwrap().unwrap().phone, Some(0));
}

#[test]
fn records_persist_across_service_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.db");

    let id = RecordService::new(StoreConfig::new(&path))
        .insert("Ann", "Math", "5551234")
        .unwrap();

    let reopened = RecordService::new(StoreConfig::new(&path).create_if_missing(false));
    let loaded = reopened.get(id).unwrap().unwrap();
    assert_eq!(loaded.name, "Ann");
}
