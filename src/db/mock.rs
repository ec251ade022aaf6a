//! Mock store for testing.
//!
//! Provides an in-memory stand-in that records calls and tracks created and
//! dropped tables without a real SQL engine.

use super::{BackingStore, ColumnInfo, ResultSet, SchemaCatalog, TableId, Value};
use crate::classify::{classify_sql, OperationKind};
use crate::error::{Result, SandboxError};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// A mock store that returns canned results.
///
/// SELECT statements yield a one-column result set echoing the SQL;
/// everything else yields no result set.
pub struct MockStore {
    tables: Mutex<BTreeSet<TableId>>,
    failure: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockStore {
    /// Creates a new mock store with no tables.
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(BTreeSet::new()),
            failure: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Creates a mock store that already knows the given tables.
    pub fn with_tables(tables: &[&str]) -> Self {
        let store = Self::new();
        if let Ok(mut known) = store.tables.lock() {
            known.extend(tables.iter().map(TableId::new));
        }
        store
    }

    /// Makes every execution fail with the given message.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Makes every execution take at least `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of statements that reached the store.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn known_tables(&self) -> Result<std::sync::MutexGuard<'_, BTreeSet<TableId>>> {
        self.tables
            .lock()
            .map_err(|_| SandboxError::internal("mock table list poisoned"))
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackingStore for MockStore {
    async fn execute(&self, sql: &str) -> Result<Option<ResultSet>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = &self.failure {
            return Err(SandboxError::store(message.clone()));
        }

        let statement = classify_sql(sql);
        match (statement.kind, statement.affected_table) {
            (OperationKind::Select, _) => Ok(Some(ResultSet::with_data(
                vec![ColumnInfo::new("result", "TEXT")],
                vec![vec![Value::String(format!("Mock result for: {sql}"))]],
            ))),
            (OperationKind::CreateTable, Some(table)) => {
                self.known_tables()?.insert(table);
                Ok(None)
            }
            (OperationKind::DropTable, Some(table)) => {
                self.known_tables()?.remove(&table);
                Ok(None)
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl SchemaCatalog for MockStore {
    async fn list_tables(&self) -> Result<Vec<TableId>> {
        Ok(self.known_tables()?.iter().cloned().collect())
    }

    async fn list_columns(&self, table: &TableId) -> Result<Vec<String>> {
        if self.known_tables()?.contains(table) {
            Ok(vec!["id".to_string()])
        } else {
            Ok(Vec::new())
        }
    }

    async fn table_rows(&self, table: &TableId) -> Result<ResultSet> {
        if self.known_tables()?.contains(table) {
            Ok(ResultSet::with_data(vec![ColumnInfo::new("id", "INTEGER")], Vec::new()))
        } else {
            Err(SandboxError::store(format!("no such table: {table}")))
        }
    }
}
