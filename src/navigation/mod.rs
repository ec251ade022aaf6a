//! Navigation state and the reconciler that drives it.
//!
//! One `NavigationState` value replaces the separate "active tab",
//! "has results" and "refresh counter" flags a view layer would otherwise
//! juggle. It changes only through [`reconcile`] and [`NavigationState::settle`].

use serde::{Serialize, Serializer};
use std::fmt;

use crate::classify::OperationKind;
use crate::db::TableId;
use crate::query::ExecutionOutcome;

/// Name of the results view when rendered or serialized.
pub const RESULTS_VIEW: &str = "results";

/// Which view is in front.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActiveView {
    /// The last submission's outcome.
    Results,
    /// The contents of one table.
    Table(TableId),
}

impl ActiveView {
    /// Parses a view name; `results` selects the results view.
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case(RESULTS_VIEW) {
            Self::Results
        } else {
            Self::Table(TableId::new(name))
        }
    }

    /// Returns the table shown, if this is a table view.
    pub fn table(&self) -> Option<&TableId> {
        match self {
            Self::Results => None,
            Self::Table(table) => Some(table),
        }
    }
}

impl fmt::Display for ActiveView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Results => f.write_str(RESULTS_VIEW),
            Self::Table(table) => write!(f, "{table}"),
        }
    }
}

impl Serialize for ActiveView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The view selector plus the metadata refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    /// View currently in front.
    pub active_view: ActiveView,
    /// Bumped once per successful mutating statement; observers refetch
    /// table and column data whenever it changes.
    pub refresh_epoch: u64,
}

impl NavigationState {
    /// Initial state: the given table in front, epoch zero.
    pub fn new(default_table: TableId) -> Self {
        Self {
            active_view: ActiveView::Table(default_table),
            refresh_epoch: 0,
        }
    }

    /// Switches the front view without touching the epoch.
    pub fn with_view(self, active_view: ActiveView) -> Self {
        Self {
            active_view,
            ..self
        }
    }

    /// Re-anchors a table view after the table list has been reloaded.
    ///
    /// A table view whose table is gone moves to the first listed table,
    /// or to the results view when no tables are left. The results view
    /// stays put.
    pub fn settle(self, tables: &[TableId]) -> Self {
        match &self.active_view {
            ActiveView::Table(t) if !tables.contains(t) => {
                let next = tables
                    .first()
                    .map_or(ActiveView::Results, |first| ActiveView::Table(first.clone()));
                self.with_view(next)
            }
            _ => self,
        }
    }

    fn bump(self) -> Self {
        Self {
            refresh_epoch: self.refresh_epoch + 1,
            ..self
        }
    }
}

/// Folds one outcome into the navigation state.
///
/// Rules, first match wins:
/// 1. created a table: show it, bump the epoch
/// 2. INSERT / UPDATE / DELETE / TRUNCATE succeeded: bump the epoch
/// 3. dropped a table: bump the epoch; if that table was in front, show results
/// 4. any other success with a result set: show results
/// 5. anything else: unchanged
pub fn reconcile(state: NavigationState, outcome: &ExecutionOutcome) -> NavigationState {
    if !outcome.success() {
        return state;
    }

    match (outcome.kind(), outcome.affected_table()) {
        (OperationKind::CreateTable, Some(table)) => {
            state.with_view(ActiveView::Table(table.clone())).bump()
        }
        (kind, _) if kind.is_data_change() => state.bump(),
        (OperationKind::DropTable, Some(table)) => {
            if state.active_view.table() == Some(table) {
                state.with_view(ActiveView::Results).bump()
            } else {
                state.bump()
            }
        }
        _ if outcome.rows().is_some() => state.with_view(ActiveView::Results),
        _ => state,
    }
}
