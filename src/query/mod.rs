//! Query execution for the sandbox.
//!
//! This module isolates SQL execution and outcome normalization from the
//! session that owns the store.

pub mod executor;
mod outcome;

pub use executor::QueryExecutor;
pub use outcome::{ExecutionOutcome, FailureKind, EMPTY_INPUT_MESSAGE, STORE_ERROR_PREFIX};
