//! The sandbox session: the boundary the presentation layer talks to.
//!
//! Owns the store handle, the navigation state and the last outcome, and
//! admits one submission at a time.

use futures::future::try_join_all;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::catalog::CatalogSnapshot;
use crate::db::{ResultSet, Store, TableId};
use crate::error::{Result, SandboxError};
use crate::navigation::{reconcile, ActiveView, NavigationState};
use crate::query::{ExecutionOutcome, QueryExecutor};

#[derive(Debug)]
struct ViewState {
    navigation: NavigationState,
    last_outcome: Option<ExecutionOutcome>,
}

/// One sandbox: a store plus the navigation state derived from what was
/// submitted to it.
pub struct Session<S: Store> {
    store: Arc<S>,
    /// Held for the whole of a submission or catalog read.
    turn: Mutex<()>,
    view: Mutex<ViewState>,
}

impl<S: Store> Session<S> {
    /// Creates a session over `store` with `default_table` in front.
    pub fn new(store: S, default_table: TableId) -> Self {
        Self::with_shared_store(Arc::new(store), default_table)
    }

    /// Creates a session over a store handle shared with the caller.
    pub fn with_shared_store(store: Arc<S>, default_table: TableId) -> Self {
        Self {
            store,
            turn: Mutex::new(()),
            view: Mutex::new(ViewState {
                navigation: NavigationState::new(default_table),
                last_outcome: None,
            }),
        }
    }

    /// Creates a session and checks `default_table` against the catalog.
    ///
    /// A default table the store does not have gives way to the first
    /// table it does have, or to the results view when it has none.
    pub async fn open(store: S, default_table: TableId) -> Result<Self> {
        let session = Self::new(store, default_table);
        session.refresh_catalog().await?;
        Ok(session)
    }

    /// Returns the store handle.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Submits a statement, waiting for any submission already in flight.
    ///
    /// Always resolves to an outcome; failures are outcomes too.
    pub async fn submit(&self, sql: &str) -> ExecutionOutcome {
        let _turn = self.turn.lock().await;
        self.run(sql).await
    }

    /// Submits a statement unless another one is still running.
    pub async fn try_submit(&self, sql: &str) -> Result<ExecutionOutcome> {
        let _turn = self
            .turn
            .try_lock()
            .map_err(|_| SandboxError::busy("another statement is still running"))?;
        Ok(self.run(sql).await)
    }

    async fn run(&self, sql: &str) -> ExecutionOutcome {
        let outcome = QueryExecutor::new(self.store.as_ref()).submit(sql).await;

        let mut view = self.view.lock().await;
        let previous = view.navigation.clone();
        view.navigation = reconcile(previous.clone(), &outcome);
        view.last_outcome = Some(outcome.clone());

        if view.navigation != previous {
            debug!(
                view = %view.navigation.active_view,
                epoch = view.navigation.refresh_epoch,
                "Navigation changed"
            );
        }

        outcome
    }

    /// Current navigation state.
    pub async fn navigation(&self) -> NavigationState {
        self.view.lock().await.navigation.clone()
    }

    /// The outcome shown in the results view, if anything was submitted.
    pub async fn last_outcome(&self) -> Option<ExecutionOutcome> {
        self.view.lock().await.last_outcome.clone()
    }

    /// Brings a view to the front, as a user picking a tab would.
    ///
    /// The results view needs a prior submission; a table view needs the
    /// table to exist.
    pub async fn select_view(&self, target: ActiveView) -> Result<NavigationState> {
        let _turn = self.turn.lock().await;

        if let ActiveView::Table(table) = &target {
            let tables = self.store.list_tables().await?;
            if !tables.contains(table) {
                return Err(SandboxError::input(format!("no such table: {table}")));
            }
        }

        let mut view = self.view.lock().await;
        if target == ActiveView::Results && view.last_outcome.is_none() {
            return Err(SandboxError::input("no results yet"));
        }
        view.navigation = view.navigation.clone().with_view(target);
        Ok(view.navigation.clone())
    }

    /// Reloads tables and their columns, then re-anchors a stale table view.
    ///
    /// Column lists are fetched concurrently; nothing else runs meanwhile.
    pub async fn refresh_catalog(&self) -> Result<CatalogSnapshot> {
        let _turn = self.turn.lock().await;

        let tables = self.store.list_tables().await?;
        let columns = try_join_all(tables.iter().map(|t| self.store.list_columns(t))).await?;

        let mut view = self.view.lock().await;
        let settled = view.navigation.clone().settle(&tables);
        if settled != view.navigation {
            info!(
                from = %view.navigation.active_view,
                to = %settled.active_view,
                "Active table no longer exists, switching view"
            );
            view.navigation = settled;
        }

        Ok(CatalogSnapshot::new(
            view.navigation.refresh_epoch,
            tables.into_iter().zip(columns).collect(),
        ))
    }

    /// Full contents of one table, for a table view.
    pub async fn table_rows(&self, table: &TableId) -> Result<ResultSet> {
        let _turn = self.turn.lock().await;
        self.store.table_rows(table).await
    }
}
