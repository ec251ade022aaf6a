//! Keyword matching and table-name extraction.
//!
//! A small fixed-keyword tokenizer, not a SQL grammar: real parsing is left
//! to the store. Multi-statement or malformed input is classified by its
//! first recognized keyword only.

use regex::Regex;
use std::sync::OnceLock;

use crate::db::TableId;

use super::{ClassifiedStatement, OperationKind};

/// Leading keywords in match order; the first prefix match wins.
const KEYWORDS: &[(&str, OperationKind)] = &[
    ("SELECT", OperationKind::Select),
    ("INSERT", OperationKind::Insert),
    ("UPDATE", OperationKind::Update),
    ("DELETE", OperationKind::Delete),
    ("CREATE", OperationKind::CreateTable),
    ("DROP", OperationKind::DropTable),
    ("TRUNCATE", OperationKind::Truncate),
];

/// Classifies statements by leading keyword.
#[derive(Debug, Clone)]
pub struct StatementClassifier {
    create_table: Regex,
    drop_table: Regex,
}

impl Default for StatementClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementClassifier {
    /// Creates a new classifier.
    pub fn new() -> Self {
        Self {
            create_table: Regex::new(r"^CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?([^\s(]+)")
                .expect("CREATE TABLE pattern is valid"),
            drop_table: Regex::new(r"^DROP\s+TABLE\s+(?:IF\s+EXISTS\s+)?([^\s;]+)")
                .expect("DROP TABLE pattern is valid"),
        }
    }

    /// Classifies a statement. Never fails; unknown input is `Other`.
    pub fn classify(&self, sql: &str) -> ClassifiedStatement {
        let upper = sql.trim().to_uppercase();

        let kind = KEYWORDS
            .iter()
            .find(|(keyword, _)| upper.starts_with(keyword))
            .map(|(_, kind)| *kind)
            .unwrap_or(OperationKind::Other);

        let pattern = match kind {
            OperationKind::CreateTable => &self.create_table,
            OperationKind::DropTable => &self.drop_table,
            _ => return ClassifiedStatement::new(kind),
        };

        match extract_identifier(pattern, &upper) {
            Some(table) => ClassifiedStatement::with_table(kind, table),
            None => ClassifiedStatement::new(kind),
        }
    }
}

/// Pulls the table name out of `upper`, dropping identifier quotes.
fn extract_identifier(pattern: &Regex, upper: &str) -> Option<TableId> {
    let raw = pattern.captures(upper)?.get(1)?.as_str();
    let name = unquote(raw);
    (!name.is_empty()).then(|| TableId::new(name))
}

fn unquote(ident: &str) -> &str {
    [('"', '"'), ('`', '`'), ('[', ']')]
        .iter()
        .find_map(|(open, close)| {
            ident
                .strip_prefix(*open)
                .and_then(|rest| rest.strip_suffix(*close))
        })
        .unwrap_or(ident)
}

/// Classifies a statement with a shared classifier.
pub fn classify_sql(sql: &str) -> ClassifiedStatement {
    static CLASSIFIER: OnceLock<StatementClassifier> = OnceLock::new();
    CLASSIFIER.get_or_init(StatementClassifier::new).classify(sql)
}
