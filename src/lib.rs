//! SQL sandbox - statement classification, execution and view navigation
//! over an in-memory SQLite database.
//!
//! This library exposes the core modules for the binary and integration tests.

pub mod catalog;
pub mod classify;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod navigation;
pub mod query;
pub mod render;
pub mod repl;
pub mod session;
