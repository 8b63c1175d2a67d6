use std::fs;
use std::sync::Arc;

use ferrum_store::config::StoreConfig;
use ferrum_store::persistence::{
    Database, DocumentStore, ErrorKind, JsonFileStore, MemoryStore, Record, StoreError,
};
use serde_json::{Value, json};
use tempfile::TempDir;

fn _prepare_database() -> (TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let database = Database::new(StoreConfig::new(dir.path()));
    (dir, database)
}

fn _record(value: Value) -> Record {
    value.as_object().cloned().unwrap()
}

#[test]
fn database_create_table_writes_empty_document() {
    let (dir, database) = _prepare_database();

    let table = database.create_table("users", false).unwrap();

    assert!(table.is_empty());
    assert_eq!(fs::read_to_string(dir.path().join("users.json")).unwrap(), "{}");
    assert!(database.table_exists("users").unwrap());
}

#[test]
fn database_create_table_keeps_existing_document() {
    let (_dir, database) = _prepare_database();
    let mut table = database.create_table("users", false).unwrap();
    let id = table.add_record(_record(json!({"name": "Alice"}))).unwrap();

    let mut again = database.create_table("users", false).unwrap();

    assert_eq!(again.len(), 1);
    assert!(again.get_record(&id).unwrap().is_some());
}

#[test]
fn database_create_table_overwrites_when_asked() {
    let (_dir, database) = _prepare_database();
    let mut table = database.create_table("users", false).unwrap();
    table.add_record(_record(json!({"name": "Alice"}))).unwrap();

    let replaced = database.create_table("users", true).unwrap();

    assert!(replaced.is_empty());
    assert!(database.open_table("users").unwrap().is_empty());
}

#[test]
fn database_create_table_in_missing_directory_fails_with_io() {
    let dir = tempfile::tempdir().unwrap();
    let database = Database::new(StoreConfig::new(dir.path().join("missing")));

    let error = database.create_table("users", false).err().unwrap();

    assert_eq!(error.kind(), ErrorKind::Io);
    assert!(!dir.path().join("missing").exists());
}

#[test]
fn database_ensure_data_path_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let database = Database::new(StoreConfig::new(dir.path().join("nested").join("tables")));

    database.ensure_data_path().unwrap();
    database.create_table("users", false).unwrap();

    assert!(dir.path().join("nested/tables/users.json").is_file());
}

#[test]
fn database_open_missing_table_is_not_found() {
    let (_dir, database) = _prepare_database();

    let error = database.open_table("ghost").err().unwrap();

    assert!(matches!(error, StoreError::TableNotFound(ref name) if name == "ghost"));
    assert_eq!(error.kind(), ErrorKind::NotFound);
}

#[test]
fn database_open_rejects_malformed_documents() {
    let (dir, database) = _prepare_database();

    for (name, contents) in [
        ("truncated", r#"{"01ARZ3NDEKTSV4RRFFQ69G5FAV": {"name": "Jo"#),
        ("list", r#"[{"name": "John"}]"#),
        ("scalar", "42"),
        ("flat", r#"{"01ARZ3NDEKTSV4RRFFQ69G5FAV": "John"}"#),
    ] {
        fs::write(dir.path().join(format!("{}.json", name)), contents).unwrap();

        let error = database.open_table(name).err().unwrap();
        assert_eq!(error.kind(), ErrorKind::Decode, "table {}", name);
    }
}

#[test]
fn database_open_reads_empty_array_as_empty_table() {
    let (dir, database) = _prepare_database();
    fs::write(dir.path().join("legacy.json"), "[]").unwrap();

    let mut table = database.open_table("legacy").unwrap();
    assert!(table.is_empty());

    table.add_record(_record(json!({"name": "John"}))).unwrap();
    let document: Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("legacy.json")).unwrap()).unwrap();
    assert!(document.is_object());
}

#[test]
fn database_open_keeps_foreign_identifiers() {
    let (dir, database) = _prepare_database();
    fs::write(
        dir.path().join("imported.json"),
        r#"{"018f4c2e-7b1a-7cc4-9d2e-2f6a1b3c4d5e": {"name": "John", "age": 30}}"#,
    )
    .unwrap();

    let mut table = database.open_table("imported").unwrap();
    let id = "018f4c2e-7b1a-7cc4-9d2e-2f6a1b3c4d5e";

    assert_eq!(
        table.get_record(id).unwrap(),
        Some(&_record(json!({"name": "John", "age": 30})))
    );
    assert_eq!(table.ids()[0].created_at(), None);
}

#[test]
fn database_invalid_table_names_are_rejected() {
    let (_dir, database) = _prepare_database();

    for name in ["", "../escape", "a/b"] {
        let error = database.create_table(name, false).err().unwrap();
        assert!(matches!(error, StoreError::InvalidTableName(_)));
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
    }
}

#[test]
fn database_last_writer_wins() {
    let (_dir, database) = _prepare_database();
    let mut first = database.create_table("shared", false).unwrap();
    let mut second = database.open_table("shared").unwrap();

    let lost = first.add_record(_record(json!({"from": "first"}))).unwrap();
    let kept = second.add_record(_record(json!({"from": "second"}))).unwrap();

    let mut reopened = database.open_table("shared").unwrap();
    assert!(reopened.get_record(&lost).unwrap().is_none());
    assert!(reopened.get_record(&kept).unwrap().is_some());
}

#[test]
fn database_drop_table_and_list_names() {
    let (dir, database) = _prepare_database();
    database.create_table("b_table", false).unwrap();
    database.create_table("a_table", false).unwrap();
    fs::write(dir.path().join("notes.txt"), "not a table").unwrap();

    assert_eq!(
        database.table_names().unwrap(),
        vec!["a_table".to_string(), "b_table".to_string()]
    );

    assert!(database.drop_table("a_table").unwrap());
    assert!(!database.drop_table("a_table").unwrap());
    assert_eq!(database.table_names().unwrap(), vec!["b_table".to_string()]);
    assert_eq!(
        database.open_table("a_table").err().unwrap().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn database_data_path_affects_later_tables_only() {
    let (first_dir, mut database) = _prepare_database();
    let second_dir = tempfile::tempdir().unwrap();

    let mut early = database.create_table("users", false).unwrap();
    database.set_data_path(second_dir.path());
    assert_eq!(database.data_path(), Some(second_dir.path()));

    early.add_record(_record(json!({"name": "Alice"}))).unwrap();
    database.create_table("users", false).unwrap();

    assert_eq!(database.open_table("users").unwrap().len(), 0);
    assert!(first_dir.path().join("users.json").is_file());
    assert!(second_dir.path().join("users.json").is_file());
}

#[test]
fn database_pretty_documents_are_indented() {
    let dir = tempfile::tempdir().unwrap();
    let database = Database::new(StoreConfig {
        data_path: dir.path().to_path_buf(),
        pretty: true,
    });

    let mut table = database.create_table("users", false).unwrap();
    table.add_record(_record(json!({"name": "Alice"}))).unwrap();

    let contents = fs::read_to_string(dir.path().join("users.json")).unwrap();
    assert!(contents.contains("\n  "));
    assert_eq!(database.open_table("users").unwrap().len(), 1);
}

#[test]
fn database_saves_leave_no_temporary_files() {
    let (dir, database) = _prepare_database();
    let mut table = database.create_table("users", false).unwrap();
    table.add_record(_record(json!({"name": "Alice"}))).unwrap();

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .filter(|name| name.to_string_lossy().ends_with(".tmp"))
        .collect();

    assert!(leftovers.is_empty());
}

#[test]
fn database_over_memory_store() {
    let store = Arc::new(MemoryStore::new());
    let database = Database::with_store(store.clone());

    let mut table = database.create_table("scratch", false).unwrap();
    let id = table.add_record(_record(json!({"name": "Alice"}))).unwrap();

    let saved: Value = serde_json::from_slice(&store.read("scratch").unwrap()).unwrap();
    assert_eq!(saved[id.as_str()]["name"], "Alice");
    assert_eq!(database.table_names().unwrap(), vec!["scratch".to_string()]);

    assert_eq!(database.data_path(), None);
    database.ensure_data_path().unwrap();
}

#[test]
fn database_failed_save_keeps_changes_in_memory() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("storage");
    let database = Database::new(StoreConfig::new(&data_path));
    database.ensure_data_path().unwrap();

    let mut table = database.create_table("users", false).unwrap();
    let id = table.add_record(_record(json!({"name": "Alice"}))).unwrap();
    fs::remove_dir_all(&data_path).unwrap();

    let error = table.add_record(_record(json!({"name": "Bob"}))).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Io);
    assert_eq!(table.len(), 2);
    assert!(table.rows().values().any(|record| record["name"] == "Bob"));

    let error = table.edit_record(&id, _record(json!({"name": "Carol"}))).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Io);
    assert_eq!(table.rows()[&id], _record(json!({"name": "Carol"})));
    assert!(!data_path.exists());
}

#[test]
fn database_open_unreadable_document_is_io() {
    let (dir, database) = _prepare_database();
    fs::create_dir(dir.path().join("folder.json")).unwrap();

    let error = database.open_table("folder").err().unwrap();

    assert!(matches!(error, StoreError::Io { .. }));
    assert_eq!(error.kind(), ErrorKind::Io);
}

#[test]
fn database_exists_reports_metadata_failures() {
    let dir = tempfile::tempdir().unwrap();
    let not_a_directory = dir.path().join("plain.txt");
    fs::write(&not_a_directory, "not a directory").unwrap();

    let store = JsonFileStore::new(&not_a_directory);
    let error = store.exists("users").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Io);

    let database = Database::new(StoreConfig::new(&not_a_directory));
    let error = database.create_table("users", false).err().unwrap();
    assert!(matches!(error, StoreError::Io { ref path, .. } if path.ends_with("users.json")));
}
