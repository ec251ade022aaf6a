//! Table and column metadata as seen by the view layer.
//!
//! A snapshot is tagged with the refresh epoch it was read at; the cache
//! refetches whenever the session's epoch moves past it.

use serde::Serialize;

use crate::db::{Store, TableId};
use crate::error::{Result, SandboxError};
use crate::session::Session;

/// Tables (alphabetical) with their columns (declared order) at one epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogSnapshot {
    epoch: u64,
    tables: Vec<(TableId, Vec<String>)>,
}

impl CatalogSnapshot {
    pub fn new(epoch: u64, tables: Vec<(TableId, Vec<String>)>) -> Self {
        Self { epoch, tables }
    }

    /// Refresh epoch the snapshot was read at.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableId> {
        self.tables.iter().map(|(table, _)| table)
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables().map(TableId::as_str).collect()
    }

    pub fn contains(&self, table: &TableId) -> bool {
        self.tables().any(|t| t == table)
    }

    /// Columns of `table`, or `None` if the table was not listed.
    pub fn columns(&self, table: &TableId) -> Option<&[String]> {
        self.tables
            .iter()
            .find(|(t, _)| t == table)
            .map(|(_, columns)| columns.as_slice())
    }
}

/// Keeps the last snapshot until the refresh epoch changes.
#[derive(Debug, Default)]
pub struct CatalogCache {
    snapshot: Option<CatalogSnapshot>,
    fetches: usize,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached snapshot, refetching if the epoch moved.
    pub async fn current<S: Store>(&mut self, session: &Session<S>) -> Result<&CatalogSnapshot> {
        let epoch = session.navigation().await.refresh_epoch;
        let stale = self.snapshot.as_ref().map_or(true, |s| s.epoch != epoch);
        if stale {
            let fresh = session.refresh_catalog().await?;
            self.fetches += 1;
            return Ok(self.snapshot.insert(fresh));
        }
        self.snapshot
            .as_ref()
            .ok_or_else(|| SandboxError::internal("catalog cache is empty"))
    }

    /// Drops the cached snapshot so the next read refetches.
    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    /// Number of times the catalog was actually read.
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }
}
