//! Backing store abstraction for the SQL sandbox.
//!
//! Provides trait-based interfaces for statement execution and schema
//! enumeration, so the orchestrator can run against SQLite or a test double.

mod mock;
pub mod sample;
mod split;
mod sqlite;
mod types;

pub use mock::MockStore;
pub use sqlite::SqliteStore;
pub use types::{ColumnInfo, Record, ResultSet, Row, TableId, Value};

use crate::error::Result;
use async_trait::async_trait;

/// Executes arbitrary SQL text.
///
/// Returns `Ok(Some(..))` for result-bearing statements (even with zero rows)
/// and `Ok(None)` for statements that return nothing. Failures carry the
/// store's own message.
#[async_trait]
pub trait BackingStore: Send + Sync {
    /// Executes the statement text and returns its first result set, if any.
    async fn execute(&self, sql: &str) -> Result<Option<ResultSet>>;
}

/// Enumerates the tables and columns currently known to the store.
#[async_trait]
pub trait SchemaCatalog: Send + Sync {
    /// Lists user tables alphabetically, excluding internal tables.
    async fn list_tables(&self) -> Result<Vec<TableId>>;

    /// Lists the columns of a table in declared order.
    async fn list_columns(&self, table: &TableId) -> Result<Vec<String>>;

    /// Returns the full contents of a table.
    async fn table_rows(&self, table: &TableId) -> Result<ResultSet>;
}

/// A store that both executes statements and exposes its catalog.
pub trait Store: BackingStore + SchemaCatalog {}

impl<T: BackingStore + SchemaCatalog> Store for T {}
