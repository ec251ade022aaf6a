//! Integration tests for the SQL sandbox.
//!
//! Every test runs against its own in-memory SQLite store, so no external
//! database is needed.

pub mod cli_test;
pub mod scenario_test;
pub mod session_test;
pub mod store_test;

use sql_sandbox::db::{SqliteStore, TableId};
use sql_sandbox::session::Session;

/// A session over a fresh store holding the sample tables.
pub async fn sample_session() -> Session<SqliteStore> {
    let store = SqliteStore::with_sample_data().await.unwrap();
    Session::new(store, TableId::new("employees"))
}
