//! SQLite backing store.
//!
//! Provides the `SqliteStore` struct that implements `BackingStore` and
//! `SchemaCatalog` over a private in-memory database using sqlx.

use crate::db::split::split_statements;
use crate::db::{
    sample, BackingStore, ColumnInfo, ResultSet, Row, SchemaCatalog, TableId, Value,
};
use crate::error::{Result, SandboxError};
use async_trait::async_trait;
use regex::Regex;
use sqlx::sqlite::{SqliteColumn, SqliteConnection, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column as SqlxColumn, Executor, Row as SqlxRow, Statement, TypeInfo, ValueRef};
use std::borrow::Cow;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info};

/// In-memory SQLite database.
///
/// The pool holds exactly one connection that never expires: every
/// connection to `:memory:` opens its own database, so the single
/// connection *is* the store.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens an empty in-memory database.
    pub async fn open_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| SandboxError::internal(format!("Invalid database options: {e}")))?
            // Sample statements delete managers that departments still point at.
            .foreign_keys(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(|e| {
                SandboxError::internal(format!("Failed to open in-memory database: {e}"))
            })?;

        debug!("Opened in-memory SQLite store");
        Ok(Self { pool })
    }

    /// Opens an in-memory database preloaded with the sample dataset.
    pub async fn with_sample_data() -> Result<Self> {
        let store = Self::open_in_memory().await?;
        store.run_script(sample::SCRIPT).await?;
        info!("Loaded sample tables: {}", sample::TABLES.join(", "));
        Ok(store)
    }

    /// Runs a multi-statement script, discarding any rows it produces.
    pub async fn run_script(&self, sql: &str) -> Result<()> {
        sqlx::raw_sql(sql)
            .execute(&self.pool)
            .await
            .map_err(SandboxError::from)?;
        Ok(())
    }

    /// Closes the connection pool, releasing the database.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl BackingStore for SqliteStore {
    async fn execute(&self, sql: &str) -> Result<Option<ResultSet>> {
        let mut pooled = self.pool.acquire().await?;
        let conn: &mut SqliteConnection = &mut pooled;
        let mut first: Option<ResultSet> = None;

        // One statement at a time, so each result set keeps its own columns
        // and later statements can see tables created earlier in the text.
        for statement in split_statements(sql) {
            let statement = rewrite_truncate(&statement);
            let declared = match conn.prepare(statement.as_ref()).await {
                Ok(prepared) => column_info(prepared.columns()),
                Err(e) => {
                    debug!("Prepare failed, falling back to row metadata: {e}");
                    Vec::new()
                }
            };

            let rows = conn.fetch_all(sqlx::raw_sql(statement.as_ref())).await?;
            if first.is_some() {
                continue;
            }

            let columns = if !declared.is_empty() {
                declared
            } else if let Some(row) = rows.first() {
                column_info(row.columns())
            } else {
                continue;
            };
            first = Some(ResultSet::with_data(
                columns,
                rows.iter().map(convert_row).collect(),
            ));
        }

        Ok(first)
    }
}

#[async_trait]
impl SchemaCatalog for SqliteStore {
    async fn list_tables(&self) -> Result<Vec<TableId>> {
        let names: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT name
            FROM sqlite_master
            WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| SandboxError::store(format!("Failed to list tables: {e}")))?;

        let mut tables: Vec<TableId> = names.iter().map(TableId::new).collect();
        tables.sort();
        Ok(tables)
    }

    async fn list_columns(&self, table: &TableId) -> Result<Vec<String>> {
        sqlx::query_scalar("SELECT name FROM pragma_table_info(?1) ORDER BY cid")
            .bind(table.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SandboxError::store(format!("Failed to list columns for {table}: {e}")))
    }

    /// Rows come back by `id` when the table has one, else in rowid order.
    async fn table_rows(&self, table: &TableId) -> Result<ResultSet> {
        let select = format!("SELECT * FROM {}", quote_ident(table.as_str()));
        let has_id = self
            .list_columns(table)
            .await?
            .iter()
            .any(|c| c.eq_ignore_ascii_case("id"));

        let rows = if has_id {
            self.execute(&format!("{select} ORDER BY \"id\"")).await?
        } else {
            match self.execute(&format!("{select} ORDER BY rowid")).await {
                Ok(rows) => rows,
                // WITHOUT ROWID tables have no rowid to order by.
                Err(e) => {
                    debug!("Unordered read of {table}: {e}");
                    self.execute(&select).await?
                }
            }
        };
        Ok(rows.unwrap_or_default())
    }
}

/// SQLite has no TRUNCATE; run it as an unqualified DELETE.
fn rewrite_truncate(sql: &str) -> Cow<'_, str> {
    static TRUNCATE: OnceLock<Regex> = OnceLock::new();
    let re = TRUNCATE.get_or_init(|| {
        Regex::new(r"(?i)^\s*TRUNCATE\s+(?:TABLE\s+)?").expect("TRUNCATE pattern is valid")
    });
    re.replace(sql, "DELETE FROM ")
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn column_info(columns: &[SqliteColumn]) -> Vec<ColumnInfo> {
    columns
        .iter()
        .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
        .collect()
}

/// Converts a sqlx SqliteRow to our Row type.
fn convert_row(row: &SqliteRow) -> Row {
    (0..row.columns().len())
        .map(|i| convert_value(row, i))
        .collect()
}

/// Converts a single cell using the value's storage class.
fn convert_value(row: &SqliteRow, index: usize) -> Value {
    let type_name = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_uppercase(),
        Err(_) => return Value::Null,
    };

    match type_name.as_str() {
        "INTEGER" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Int)
            .unwrap_or(Value::Null),

        "REAL" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Float)
            .unwrap_or(Value::Null),

        "BLOB" => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bytes)
            .unwrap_or(Value::Null),

        _ => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}
