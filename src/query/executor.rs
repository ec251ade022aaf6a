//! Statement execution against the backing store.
//!
//! Provides isolated query execution that can be tested independently
//! of the session.

use std::time::Instant;
use tracing::{debug, warn};

use crate::classify::classify_sql;
use crate::db::BackingStore;

use super::ExecutionOutcome;

/// Runs statements and turns every result into an `ExecutionOutcome`.
pub struct QueryExecutor<'a> {
    store: &'a dyn BackingStore,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new query executor.
    pub fn new(store: &'a dyn BackingStore) -> Self {
        Self { store }
    }

    /// Classifies and executes `sql`.
    ///
    /// Never fails: blank input and store errors come back as failed
    /// outcomes. The text goes to the store as given, not uppercased.
    pub async fn submit(&self, sql: &str) -> ExecutionOutcome {
        if sql.trim().is_empty() {
            debug!("Rejected blank statement");
            return ExecutionOutcome::empty_input();
        }

        let statement = classify_sql(sql);

        let start = Instant::now();
        let result = self.store.execute(sql).await;
        let elapsed = start.elapsed();

        match result {
            Ok(rows) => {
                debug!(
                    kind = %statement.kind,
                    mutating = statement.kind.is_mutating(),
                    rows = rows.as_ref().map(|r| r.row_count()),
                    elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                    "Statement succeeded"
                );
                ExecutionOutcome::succeeded(statement, rows, elapsed)
            }
            Err(e) => {
                warn!(
                    kind = %statement.kind,
                    mutating = statement.kind.is_mutating(),
                    "Statement failed: {}", e.message());
                ExecutionOutcome::failed(statement, &e, elapsed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::OperationKind;
    use crate::db::{MockStore, TableId};
    use crate::query::FailureKind;

    #[tokio::test]
    async fn test_submit_select() {
        let store = MockStore::new();
        let executor = QueryExecutor::new(&store);

        let outcome = executor.submit("SELECT * FROM users").await;

        assert!(outcome.success());
        assert_eq!(outcome.kind(), OperationKind::Select);
        assert_eq!(outcome.record_count(), Some(1));
        assert!(outcome.elapsed_ms() >= 0.0);
    }

    #[tokio::test]
    async fn test_submit_ddl_has_no_rows() {
        let store = MockStore::new();
        let executor = QueryExecutor::new(&store);

        let outcome = executor
            .submit("CREATE TABLE IF NOT EXISTS Skills (id INTEGER PRIMARY KEY)")
            .await;

        assert!(outcome.success());
        assert_eq!(outcome.kind(), OperationKind::CreateTable);
        assert_eq!(outcome.affected_table(), Some(&TableId::new("skills")));
        assert!(outcome.rows().is_none());
    }

    #[tokio::test]
    async fn test_blank_input_never_reaches_store() {
        let store = MockStore::new();
        let executor = QueryExecutor::new(&store);

        for sql in ["", "   ", "\n\t  \n"] {
            let outcome = executor.submit(sql).await;
            assert!(!outcome.success());
            assert_eq!(outcome.failure(), Some(FailureKind::Input));
            assert_eq!(outcome.elapsed_ms(), 0.0);
        }
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_becomes_outcome() {
        let store = MockStore::new().failing("no such table: nope");
        let executor = QueryExecutor::new(&store);

        let outcome = executor.submit("DELETE FROM nope").await;

        assert!(!outcome.success());
        assert_eq!(outcome.kind(), OperationKind::Delete);
        assert_eq!(outcome.error(), Some("SQL error: no such table: nope"));
        assert_eq!(outcome.failure(), Some(FailureKind::Store));
    }

    #[tokio::test]
    async fn test_repeated_failure_is_deterministic() {
        let store = MockStore::new().failing("near \"SELEC\": syntax error");
        let executor = QueryExecutor::new(&store);

        let first = executor.submit("SELEC * FROM x").await;
        let second = executor.submit("SELEC * FROM x").await;

        assert_eq!(first.error(), second.error());
        assert_eq!(first.kind(), second.kind());
        assert_eq!(store.call_count(), 2);
    }
}
