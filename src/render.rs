//! Text and JSON rendering of outcomes, result sets and navigation.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::catalog::CatalogSnapshot;
use crate::db::{ResultSet, TableId};
use crate::error::{Result, SandboxError};
use crate::navigation::{ActiveView, NavigationState, RESULTS_VIEW};
use crate::query::ExecutionOutcome;

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned tables for people.
    #[default]
    Text,
    /// One JSON object per submission.
    Json,
}

/// Renders sandbox data as strings.
#[derive(Debug, Clone)]
pub struct Renderer {
    format: OutputFormat,
    max_rows: usize,
}

impl Renderer {
    pub fn new(format: OutputFormat, max_rows: usize) -> Self {
        Self {
            format,
            max_rows: max_rows.max(1),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// The results view: result set, confirmation, or error panel.
    pub fn outcome(&self, outcome: &ExecutionOutcome) -> String {
        if let Some(error) = outcome.error() {
            return format!("Error: {error}\n");
        }

        match outcome.rows() {
            Some(rows) => format!(
                "{}{} · {:.2} ms\n",
                self.result_set(rows),
                plural(rows.row_count(), "row"),
                outcome.elapsed_ms()
            ),
            None => self.summary(outcome),
        }
    }

    /// One status line for an outcome.
    pub fn summary(&self, outcome: &ExecutionOutcome) -> String {
        match (outcome.error(), outcome.affected_table()) {
            (Some(error), _) => format!("Error: {error}\n"),
            (None, Some(table)) => format!(
                "OK: {} {} · {:.2} ms\n",
                outcome.kind(),
                table,
                outcome.elapsed_ms()
            ),
            (None, None) => format!("OK: {} · {:.2} ms\n", outcome.kind(), outcome.elapsed_ms()),
        }
    }

    /// An aligned table; zero rows render as an explicit "(no rows)".
    pub fn result_set(&self, rs: &ResultSet) -> String {
        if rs.is_empty() {
            return "(no rows)\n".to_string();
        }

        let shown = &rs.rows[..rs.row_count().min(self.max_rows)];
        let cells: Vec<Vec<String>> = shown
            .iter()
            .map(|row| row.iter().map(|v| v.to_display_string()).collect())
            .collect();

        let mut widths: Vec<usize> = rs.columns.iter().map(|c| c.name.chars().count()).collect();
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let rule = format!(
            "+{}+\n",
            widths
                .iter()
                .map(|w| "-".repeat(w + 2))
                .collect::<Vec<_>>()
                .join("+")
        );

        let mut out = String::new();
        out.push_str(&rule);
        out.push_str(&line(rs.columns.iter().map(|c| c.name.as_str()), &widths));
        out.push_str(&rule);
        for row in &cells {
            out.push_str(&line(row.iter().map(String::as_str), &widths));
        }
        out.push_str(&rule);

        if shown.len() < rs.row_count() {
            let _ = writeln!(
                out,
                "Display truncated: showing {} of {} rows",
                shown.len(),
                rs.row_count()
            );
        }
        out
    }

    /// A table view with its name as a heading.
    pub fn table_view(&self, table: &TableId, rs: &ResultSet) -> String {
        format!("== {table} ==\n{}", self.result_set(rs))
    }

    /// The tab strip: every table plus the results tab, active one starred.
    pub fn tabs(&self, catalog: &CatalogSnapshot, nav: &NavigationState, has_results: bool) -> String {
        let mut tabs: Vec<String> = catalog
            .tables()
            .map(|table| tab(table.as_str(), nav.active_view.table() == Some(table)))
            .collect();
        if has_results {
            tabs.push(tab(RESULTS_VIEW, nav.active_view == ActiveView::Results));
        }
        format!("{}\n", tabs.join(" "))
    }

    /// Columns of one table, one per line.
    pub fn columns(&self, table: &TableId, columns: &[String]) -> String {
        let mut out = format!("{table}:\n");
        for column in columns {
            let _ = writeln!(out, "  {column}");
        }
        out
    }

    pub fn navigation(&self, nav: &NavigationState) -> String {
        format!(
            "view: {} · refresh epoch: {}\n",
            nav.active_view, nav.refresh_epoch
        )
    }

    /// One JSON line describing a submission and the state it produced.
    pub fn json_submission(&self, outcome: &ExecutionOutcome, nav: &NavigationState) -> Result<String> {
        let value = serde_json::json!({
            "outcome": outcome,
            "navigation": nav,
        });
        serde_json::to_string(&value)
            .map(|s| s + "\n")
            .map_err(|e| SandboxError::internal(format!("Failed to serialize outcome: {e}")))
    }
}

fn line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width - cell.chars().count();
            format!(" {cell}{} ", " ".repeat(pad))
        })
        .collect();
    format!("|{}|\n", padded.join("|"))
}

fn tab(name: &str, active: bool) -> String {
    if active {
        format!("*{name}*")
    } else {
        format!("[{name}]")
    }
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}
