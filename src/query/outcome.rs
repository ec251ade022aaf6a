//! The normalized result of one submission.

use serde::Serialize;
use std::time::Duration;

use crate::classify::{ClassifiedStatement, OperationKind};
use crate::db::{ResultSet, TableId};
use crate::error::SandboxError;

/// Message used when a blank statement is submitted.
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a SQL query";

/// Prefix added to messages raised by the store.
pub const STORE_ERROR_PREFIX: &str = "SQL error: ";

/// Why a submission failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Rejected before reaching the store.
    Input,
    /// Raised by the store during execution.
    Store,
}

/// Immutable summary of one submission: result, timing and classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionOutcome {
    success: bool,
    rows: Option<ResultSet>,
    error: Option<String>,
    failure: Option<FailureKind>,
    elapsed_ms: f64,
    kind: OperationKind,
    affected_table: Option<TableId>,
}

impl ExecutionOutcome {
    /// A statement the store ran successfully.
    pub fn succeeded(
        statement: ClassifiedStatement,
        rows: Option<ResultSet>,
        elapsed: Duration,
    ) -> Self {
        Self {
            success: true,
            rows,
            error: None,
            failure: None,
            elapsed_ms: duration_ms(elapsed),
            kind: statement.kind,
            affected_table: statement.affected_table,
        }
    }

    /// A statement the store rejected; the message gets the store prefix.
    pub fn failed(statement: ClassifiedStatement, error: &SandboxError, elapsed: Duration) -> Self {
        Self {
            success: false,
            rows: None,
            error: Some(format!("{STORE_ERROR_PREFIX}{}", error.message())),
            failure: Some(FailureKind::Store),
            elapsed_ms: duration_ms(elapsed),
            kind: statement.kind,
            affected_table: statement.affected_table,
        }
    }

    /// Blank input, rejected without contacting the store.
    pub fn empty_input() -> Self {
        Self {
            success: false,
            rows: None,
            error: Some(EMPTY_INPUT_MESSAGE.to_string()),
            failure: Some(FailureKind::Input),
            elapsed_ms: 0.0,
            kind: OperationKind::Other,
            affected_table: None,
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    /// The first result set, present only for result-bearing statements.
    pub fn rows(&self) -> Option<&ResultSet> {
        self.rows.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn failure(&self) -> Option<FailureKind> {
        self.failure
    }

    /// Wall-clock execution time with sub-millisecond resolution.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn affected_table(&self) -> Option<&TableId> {
        self.affected_table.as_ref()
    }

    /// Number of rows returned, when the statement returned a result set.
    pub fn record_count(&self) -> Option<usize> {
        self.rows.as_ref().map(ResultSet::row_count)
    }
}

fn duration_ms(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}
