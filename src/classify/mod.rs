//! Lexical statement classification.
//!
//! Sorts SQL text into an operation category by its leading keyword and,
//! for CREATE TABLE / DROP TABLE, pulls out the target table name.

mod parser;

pub use parser::{classify_sql, StatementClassifier};

use crate::db::TableId;
use serde::Serialize;
use std::fmt;

/// The operation category of a submitted statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    Select,
    Insert,
    Update,
    Delete,
    /// Any statement starting with CREATE.
    CreateTable,
    /// Any statement starting with DROP.
    DropTable,
    Truncate,
    /// No recognized leading keyword.
    Other,
}

impl OperationKind {
    /// Returns true for statements that change data or schema.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Self::Select | Self::Other)
    }

    /// Returns true for the row-level mutations (and TRUNCATE).
    pub fn is_data_change(&self) -> bool {
        matches!(
            self,
            Self::Insert | Self::Update | Self::Delete | Self::Truncate
        )
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select => write!(f, "SELECT"),
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::CreateTable => write!(f, "CREATE TABLE"),
            Self::DropTable => write!(f, "DROP TABLE"),
            Self::Truncate => write!(f, "TRUNCATE"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

/// Result of classifying a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedStatement {
    /// The operation category.
    pub kind: OperationKind,
    /// Table named by CREATE TABLE / DROP TABLE, lowercased.
    pub affected_table: Option<TableId>,
}

impl ClassifiedStatement {
    /// Creates a classification without a target table.
    pub fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            affected_table: None,
        }
    }

    /// Creates a classification with a target table.
    pub fn with_table(kind: OperationKind, table: TableId) -> Self {
        Self {
            kind,
            affected_table: Some(table),
        }
    }
}
