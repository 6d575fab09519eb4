use outlay::config::{Backend, Settings};
use outlay::import::import_csv;
use outlay::models::Expense;
use outlay::ops::{add_expense, delete_expense, read_all};
use outlay::report::{render_export, render_report};
use outlay::sqlite_storage::SqliteConnector;
use outlay::storage::{self, Connector};
use outlay::Error;

fn memory_db() -> SqliteConnector {
    SqliteConnector::prepare_database(":memory:").unwrap()
}

#[test]
fn add_then_read_round_trips() {
    let mut db = memory_db();
    add_expense(&mut db, 12.5, "groceries").unwrap();

    let expenses = read_all(&mut db).unwrap();
    assert_eq!(
        expenses,
        vec![Expense {
            id: Some(1),
            amount: 12.5,
            description: "groceries".into(),
        }]
    );
}

#[test]
fn add_rejects_invalid_expenses_and_stores_nothing() {
    let mut db = memory_db();
    assert!(matches!(
        add_expense(&mut db, 0.0, "free lunch"),
        Err(Error::NonPositiveAmount)
    ));
    assert!(matches!(
        add_expense(&mut db, 5.0, ""),
        Err(Error::EmptyDescription)
    ));
    assert!(read_all(&mut db).unwrap().is_empty());
}

#[test]
fn delete_is_idempotent_and_removes_the_row() {
    let mut db = memory_db();
    add_expense(&mut db, 3.0, "bus").unwrap();
    add_expense(&mut db, 7.0, "lunch").unwrap();

    delete_expense(&mut db, 1).unwrap();
    delete_expense(&mut db, 1).unwrap();

    let expenses = read_all(&mut db).unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].id, Some(2));
    assert_eq!(expenses[0].description, "lunch");
}

#[test]
fn report_renders_stored_expenses_with_total() {
    let mut db = memory_db();
    add_expense(&mut db, 40.0, "test").unwrap();
    add_expense(&mut db, 1001.0, "test").unwrap();

    let rendered = render_report(&read_all(&mut db).unwrap());
    assert!(rendered.starts_with("-ID--AMOUNT--BIG?--------DESCRIPTION-------\n"));
    assert!(rendered.contains("(!)"));
    assert!(rendered.ends_with("TOTAL = 1041\n"));
}

#[test]
fn export_renders_one_debug_list_line() {
    let mut db = memory_db();
    add_expense(&mut db, 40.0, "test").unwrap();

    let rendered = render_export(&read_all(&mut db).unwrap());
    assert_eq!(
        rendered,
        "[Expense { id: Some(1), amount: 40.0, description: \"test\" }]"
    );
}

#[test]
fn csv_import_inserts_valid_rows_and_skips_bad_ones() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("expenses.csv");
    std::fs::write(&path, "amount,description\n40,test\n-3,bad\n19.99,book\n").unwrap();

    let mut db = memory_db();
    let imported = import_csv(&mut db, path.to_str().unwrap()).unwrap();
    assert_eq!(imported, 2);

    let expenses = read_all(&mut db).unwrap();
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0].amount, 40.0);
    assert_eq!(expenses[1].description, "book");
}

#[test]
fn csv_import_of_missing_file_fails_without_inserting() {
    let mut db = memory_db();
    assert!(matches!(
        import_csv(&mut db, "does-not-exist.csv"),
        Err(Error::FileNotFound(_))
    ));
    assert!(read_all(&mut db).unwrap().is_empty());
}

#[test]
fn settings_slot_defaults_to_unset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("outlay.toml");
    assert_eq!(Settings::load(path.to_str().unwrap()).unwrap(), Backend::Unset);
}

#[test]
fn connecting_with_an_unset_backend_fails() {
    assert!(matches!(
        storage::connect(Backend::Unset),
        Err(Error::MissingConfiguration)
    ));
}

#[test]
fn drop_database_removes_the_backing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("expenses.db");
    let path_str = path.to_str().unwrap();

    let mut db = SqliteConnector::prepare_database(path_str).unwrap();
    add_expense(&mut db, 1.0, "doomed").unwrap();
    assert!(path.exists());

    Box::new(db).drop_database().unwrap();
    assert!(!path.exists());
}

#[test]
fn file_backed_database_persists_across_connectors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("expenses.db");
    let path_str = path.to_str().unwrap();

    let mut db = SqliteConnector::prepare_database(path_str).unwrap();
    add_expense(&mut db, 2.5, "persisted").unwrap();
    drop(db);

    let mut db = SqliteConnector::prepare_database(path_str).unwrap();
    let expenses = read_all(&mut db).unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].description, "persisted");
}
