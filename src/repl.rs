//! Line-oriented front end over a [`Session`].
//!
//! Statements end with `;` at the end of a line or with a blank line.
//! Lines starting with `.` outside a statement are meta-commands.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::catalog::CatalogCache;
use crate::db::{Store, TableId};
use crate::error::{Result, SandboxError};
use crate::navigation::ActiveView;
use crate::query::ExecutionOutcome;
use crate::render::{OutputFormat, Renderer};
use crate::session::Session;

const PROMPT: &str = "sql> ";
const CONTINUATION_PROMPT: &str = "  -> ";

const HELP: &str = "\
Statements end with ';' at the end of a line, or with a blank line.

.tables            list tables, marking the active view
.columns <table>   list the columns of a table
.view <table>      bring a table to the front
.view results      bring the last result to the front
.state             show the active view and refresh epoch
.help              show this help
.quit              leave
";

/// Accumulates input lines into complete statements.
#[derive(Debug, Default)]
pub struct StatementBuffer {
    lines: Vec<String>,
}

impl StatementBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Adds a line, returning a statement once one is complete.
    pub fn push_line(&mut self, line: &str) -> Option<String> {
        if line.trim().is_empty() {
            return self.finish();
        }
        self.lines.push(line.trim_end().to_string());
        if line.trim_end().ends_with(';') {
            self.finish()
        } else {
            None
        }
    }

    /// Returns whatever is buffered as a statement, if anything.
    pub fn finish(&mut self) -> Option<String> {
        if self.lines.is_empty() {
            return None;
        }
        let statement = self.lines.join("\n");
        self.lines.clear();
        Some(statement)
    }
}

/// A dot-prefixed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaCommand {
    Tables,
    Columns(TableId),
    View(ActiveView),
    State,
    Help,
    Quit,
}

impl MetaCommand {
    /// Parses a meta-command; `Ok(None)` when the line is not one.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let Some(rest) = line.trim().strip_prefix('.') else {
            return Ok(None);
        };
        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next();

        let command = match (name.as_str(), arg) {
            ("tables", _) => Self::Tables,
            ("columns", Some(table)) => Self::Columns(TableId::new(table)),
            ("view", Some(view)) => Self::View(ActiveView::parse(view)),
            ("state", _) => Self::State,
            ("help", _) => Self::Help,
            ("quit" | "exit", _) => Self::Quit,
            ("columns" | "view", None) => {
                return Err(SandboxError::input(format!(".{name} needs an argument")))
            }
            _ => {
                return Err(SandboxError::input(format!(
                    "unknown command .{name} (try .help)"
                )))
            }
        };
        Ok(Some(command))
    }
}

/// Drives a session from text input and writes what the user would see.
pub struct Repl<'a, S: Store, W> {
    session: &'a Session<S>,
    renderer: Renderer,
    catalog: CatalogCache,
    out: W,
    failures: usize,
}

impl<'a, S: Store, W: AsyncWrite + Unpin> Repl<'a, S, W> {
    pub fn new(session: &'a Session<S>, renderer: Renderer, out: W) -> Self {
        Self {
            session,
            renderer,
            catalog: CatalogCache::new(),
            out,
            failures: 0,
        }
    }

    /// Number of submissions that did not succeed.
    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    /// Reads statements and meta-commands until end of input or `.quit`.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R, prompt: bool) -> Result<()> {
        let mut lines = input.lines();
        let mut buffer = StatementBuffer::new();

        if prompt {
            self.show_tabs().await?;
        }

        loop {
            if prompt {
                let text = if buffer.is_empty() { PROMPT } else { CONTINUATION_PROMPT };
                self.write(text).await?;
            }

            let Some(line) = lines
                .next_line()
                .await
                .map_err(|e| SandboxError::internal(format!("Failed to read input: {e}")))?
            else {
                break;
            };

            if buffer.is_empty() {
                match MetaCommand::parse(&line) {
                    Ok(Some(MetaCommand::Quit)) => return Ok(()),
                    Ok(Some(command)) => {
                        self.meta(command).await?;
                        continue;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        self.write(&format!("Error: {}\n", e.message())).await?;
                        continue;
                    }
                }
            }

            if let Some(sql) = buffer.push_line(&line) {
                self.execute(&sql).await?;
            }
        }

        if let Some(sql) = buffer.finish() {
            self.execute(&sql).await?;
        }
        Ok(())
    }

    /// Submits one statement and shows the view that results.
    pub async fn execute(&mut self, sql: &str) -> Result<()> {
        let outcome = self.session.submit(sql).await;
        if !outcome.success() {
            self.failures += 1;
        }

        // Reading the catalog also moves a table view off a vanished table.
        self.catalog.current(self.session).await?;

        match self.renderer.format() {
            OutputFormat::Json => {
                let nav = self.session.navigation().await;
                let json = self.renderer.json_submission(&outcome, &nav)?;
                self.write(&json).await
            }
            OutputFormat::Text => self.show_front(&outcome).await,
        }
    }

    async fn show_front(&mut self, outcome: &ExecutionOutcome) -> Result<()> {
        let nav = self.session.navigation().await;
        let text = match &nav.active_view {
            ActiveView::Results => self.renderer.outcome(outcome),
            ActiveView::Table(table) => {
                let mut text = self.renderer.summary(outcome);
                text.push_str(&self.table_text(table).await);
                text
            }
        };
        self.write(&text).await
    }

    async fn table_text(&self, table: &TableId) -> String {
        match self.session.table_rows(table).await {
            Ok(rows) => self.renderer.table_view(table, &rows),
            Err(e) => {
                warn!(table = %table, "Failed to read table: {}", e);
                format!("Error: {}\n", e.message())
            }
        }
    }

    async fn meta(&mut self, command: MetaCommand) -> Result<()> {
        debug!(?command, "Meta-command");
        let text = match command {
            MetaCommand::Tables => return self.show_tabs().await,
            MetaCommand::Columns(table) => {
                let snapshot = self.catalog.current(self.session).await?;
                match snapshot.columns(&table) {
                    Some(columns) => self.renderer.columns(&table, columns),
                    None => format!("Error: no such table: {table}\n"),
                }
            }
            MetaCommand::View(target) => match self.session.select_view(target).await {
                Ok(nav) => match &nav.active_view {
                    ActiveView::Results => match self.session.last_outcome().await {
                        Some(outcome) => self.renderer.outcome(&outcome),
                        None => String::new(),
                    },
                    ActiveView::Table(table) => self.table_text(table).await,
                },
                Err(e) => format!("Error: {}\n", e.message()),
            },
            MetaCommand::State => {
                let nav = self.session.navigation().await;
                self.renderer.navigation(&nav)
            }
            MetaCommand::Help => HELP.to_string(),
            MetaCommand::Quit => String::new(),
        };
        self.write(&text).await
    }

    async fn show_tabs(&mut self) -> Result<()> {
        let has_results = self.session.last_outcome().await.is_some();
        let snapshot = self.catalog.current(self.session).await?;
        let nav = self.session.navigation().await;
        let text = self.renderer.tabs(snapshot, &nav, has_results);
        self.write(&text).await
    }

    async fn write(&mut self, text: &str) -> Result<()> {
        self.out
            .write_all(text.as_bytes())
            .await
            .and(self.out.flush().await)
            .map_err(|e| SandboxError::internal(format!("Failed to write output: {e}")))
    }
}
