//! End-to-end submissions through a session over the sample dataset.

use super::sample_session;
use pretty_assertions::assert_eq;
use sql_sandbox::classify::OperationKind;
use sql_sandbox::db::{SchemaCatalog, TableId};
use sql_sandbox::navigation::ActiveView;
use sql_sandbox::query::{FailureKind, EMPTY_INPUT_MESSAGE};

#[tokio::test]
async fn test_select_with_limit_shows_results() {
    let session = sample_session().await;

    let outcome = session.submit("SELECT * FROM employees LIMIT 5").await;

    assert!(outcome.success());
    assert_eq!(outcome.kind(), OperationKind::Select);
    assert!(outcome.record_count().unwrap() <= 5);
    assert_eq!(session.navigation().await.active_view, ActiveView::Results);
}

#[tokio::test]
async fn test_create_table_if_not_exists_shows_table() {
    let session = sample_session().await;

    let outcome = session
        .submit("CREATE TABLE IF NOT EXISTS skills (id INTEGER PRIMARY KEY)")
        .await;

    assert!(outcome.success());
    assert_eq!(outcome.kind(), OperationKind::CreateTable);
    assert_eq!(outcome.affected_table(), Some(&TableId::new("skills")));
    let nav = session.navigation().await;
    assert_eq!(nav.active_view, ActiveView::Table(TableId::new("skills")));
    assert_eq!(nav.refresh_epoch, 1);
}

#[tokio::test]
async fn test_drop_active_table() {
    let session = sample_session().await;
    session
        .submit("CREATE TABLE IF NOT EXISTS skills (id INTEGER PRIMARY KEY)")
        .await;

    let outcome = session.submit("DROP TABLE IF EXISTS skills").await;

    assert!(outcome.success());
    assert_eq!(outcome.kind(), OperationKind::DropTable);
    let nav = session.navigation().await;
    assert_eq!(nav.refresh_epoch, 2);
    assert_eq!(nav.active_view, ActiveView::Results);

    let tables = session.store().list_tables().await.unwrap();
    assert!(!tables.contains(&TableId::new("skills")));
}

#[tokio::test]
async fn test_empty_input_changes_nothing() {
    let session = sample_session().await;
    let before = session.navigation().await;

    let outcome = session.submit("").await;

    assert!(!outcome.success());
    assert_eq!(outcome.error(), Some(EMPTY_INPUT_MESSAGE));
    assert_eq!(outcome.failure(), Some(FailureKind::Input));
    assert_eq!(outcome.elapsed_ms(), 0.0);
    assert_eq!(session.navigation().await, before);
}

#[tokio::test]
async fn test_malformed_keyword_surfaces_store_error() {
    let session = sample_session().await;

    let outcome = session.submit("SELEC * FROM x").await;

    assert!(!outcome.success());
    assert_eq!(outcome.kind(), OperationKind::Other);
    assert_eq!(outcome.failure(), Some(FailureKind::Store));
    let error = outcome.error().unwrap();
    assert!(error.starts_with("SQL error: "), "{error}");
    assert!(error.contains("syntax error"), "{error}");
    assert_eq!(session.navigation().await.refresh_epoch, 0);
}

#[tokio::test]
async fn test_data_changes_bump_epoch_and_keep_view() {
    let session = sample_session().await;

    for sql in [
        "INSERT INTO employees (name, position, department, salary, hire_date) VALUES ('New Hire', 'Intern', 'Engineering', 3000000, '2024-04-01')",
        "UPDATE employees SET salary = salary + 100000 WHERE department = 'Engineering'",
        "DELETE FROM employees WHERE name = 'New Hire'",
        "TRUNCATE TABLE projects",
    ] {
        let outcome = session.submit(sql).await;
        assert!(outcome.success(), "{sql}: {:?}", outcome.error());
        assert_eq!(outcome.rows(), None, "{sql}");
    }

    let nav = session.navigation().await;
    assert_eq!(nav.refresh_epoch, 4);
    assert_eq!(nav.active_view, ActiveView::Table(TableId::new("employees")));
}

#[tokio::test]
async fn test_zero_row_select_still_shows_results() {
    let session = sample_session().await;

    let outcome = session
        .submit("SELECT * FROM employees WHERE department = 'Nowhere'")
        .await;

    assert!(outcome.success());
    assert_eq!(outcome.record_count(), Some(0));
    assert_eq!(session.navigation().await.active_view, ActiveView::Results);
}

#[tokio::test]
async fn test_repeated_failure_is_deterministic() {
    let session = sample_session().await;

    let first = session.submit("INSERT INTO nope VALUES (1)").await;
    let second = session.submit("INSERT INTO nope VALUES (1)").await;

    assert_eq!(first.error(), second.error());
    assert_eq!(first.kind(), OperationKind::Insert);
    assert_eq!(session.navigation().await.refresh_epoch, 0);
}

#[tokio::test]
async fn test_drop_unrelated_table_keeps_view() {
    let session = sample_session().await;

    let outcome = session.submit("DROP TABLE projects").await;

    assert!(outcome.success());
    let nav = session.navigation().await;
    assert_eq!(nav.active_view, ActiveView::Table(TableId::new("employees")));
    assert_eq!(nav.refresh_epoch, 1);
}
