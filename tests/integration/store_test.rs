//! Backing store and catalog behaviour against SQLite.

use pretty_assertions::assert_eq;
use sql_sandbox::db::{BackingStore, ResultSet, SchemaCatalog, SqliteStore, TableId, Value};

async fn sample_store() -> SqliteStore {
    SqliteStore::with_sample_data().await.unwrap()
}

fn cell<'a>(rows: &'a ResultSet, index: usize, column: &str) -> Option<&'a Value> {
    rows.records()
        .nth(index)?
        .into_iter()
        .find(|(name, _)| *name == column)
        .map(|(_, value)| value)
}

#[tokio::test]
async fn test_sample_tables_are_listed_alphabetically() {
    let store = sample_store().await;
    let tables = store.list_tables().await.unwrap();
    assert_eq!(
        tables,
        vec![
            TableId::new("departments"),
            TableId::new("employees"),
            TableId::new("projects"),
        ]
    );
}

#[tokio::test]
async fn test_columns_in_declared_order() {
    let store = sample_store().await;
    let columns = store.list_columns(&TableId::new("employees")).await.unwrap();
    assert_eq!(
        columns,
        vec!["id", "name", "position", "department", "salary", "hire_date"]
    );
}

#[tokio::test]
async fn test_unknown_table_has_no_columns() {
    let store = sample_store().await;
    let columns = store.list_columns(&TableId::new("nope")).await.unwrap();
    assert!(columns.is_empty());
}

#[tokio::test]
async fn test_table_rows_returns_whole_table() {
    let store = sample_store().await;
    let rows = store.table_rows(&TableId::new("projects")).await.unwrap();
    assert_eq!(rows.row_count(), 6);
    assert_eq!(rows.column_names()[0], "id");
    assert_eq!(cell(&rows, 4, "end_date"), Some(&Value::Null));
}

#[tokio::test]
async fn test_table_rows_for_missing_table_is_error() {
    let store = sample_store().await;
    let err = store.table_rows(&TableId::new("nope")).await.unwrap_err();
    assert_eq!(err.category(), "Store Error");
    assert!(err.message().contains("no such table"));
}

#[tokio::test]
async fn test_zero_row_select_keeps_columns() {
    let store = sample_store().await;
    let rows = store
        .execute("SELECT id, name FROM employees WHERE salary < 0")
        .await
        .unwrap()
        .expect("result-bearing statement");
    assert!(rows.is_empty());
    assert_eq!(rows.column_names(), vec!["id", "name"]);
}

#[tokio::test]
async fn test_statements_without_results() {
    let store = sample_store().await;
    for sql in [
        "UPDATE employees SET salary = salary + 1",
        "CREATE INDEX idx_salary ON employees (salary)",
        "DELETE FROM projects WHERE status = 'Completed'",
    ] {
        assert_eq!(store.execute(sql).await.unwrap(), None, "{sql}");
    }
}

#[tokio::test]
async fn test_truncate_empties_table() {
    let store = sample_store().await;
    assert_eq!(store.execute("TRUNCATE TABLE projects").await.unwrap(), None);
    let rows = store.table_rows(&TableId::new("projects")).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_aggregate_values() {
    let store = sample_store().await;
    let rows = store
        .execute("SELECT department, COUNT(*) AS n FROM employees GROUP BY department ORDER BY n DESC, department LIMIT 1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cell(&rows, 0, "department"), Some(&Value::String("Engineering".into())));
    assert_eq!(cell(&rows, 0, "n"), Some(&Value::Int(4)));
}

#[tokio::test]
async fn test_stores_are_isolated() {
    let first = sample_store().await;
    let second = SqliteStore::open_in_memory().await.unwrap();

    first.execute("CREATE TABLE skills (id INTEGER)").await.unwrap();

    assert!(first.list_tables().await.unwrap().contains(&TableId::new("skills")));
    assert!(second.list_tables().await.unwrap().is_empty());
}
