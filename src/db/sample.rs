//! Sample dataset loaded into a fresh store.

/// DDL and rows for the sample tables.
pub const SCRIPT: &str = include_str!("sample_data.sql");

/// Tables created by [`SCRIPT`], alphabetically.
pub const TABLES: &[&str] = &["departments", "employees", "projects"];

/// Table shown when the sandbox starts.
pub const DEFAULT_TABLE: &str = "employees";
