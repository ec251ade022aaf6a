//! Statement splitting for multi-statement submissions.
//!
//! Semicolons inside quoted text, bracketed identifiers, comments and
//! trigger bodies do not end a statement.

use regex::Regex;
use std::sync::OnceLock;

/// Splits SQL text into statements, in order, without their terminators.
///
/// Pieces holding only whitespace or comments are dropped. Unterminated
/// quotes or comments run to the end of the input and are left for the
/// store to reject.
pub fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut has_code = false;
    let mut chars = sql.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '-' if chars.peek() == Some(&'-') => {
                current.push(ch);
                for c in chars.by_ref() {
                    current.push(c);
                    if c == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                current.push(ch);
                current.extend(chars.next());
                let mut prev = '\0';
                for c in chars.by_ref() {
                    current.push(c);
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            '\'' | '"' | '`' | '[' => {
                let close = if ch == '[' { ']' } else { ch };
                has_code = true;
                current.push(ch);
                while let Some(c) = chars.next() {
                    current.push(c);
                    if c == close {
                        // A doubled quote is an escaped quote.
                        if close != ']' && chars.peek() == Some(&close) {
                            current.extend(chars.next());
                            continue;
                        }
                        break;
                    }
                }
            }
            ';' if !in_trigger_body(&current) => {
                if has_code {
                    statements.push(current.trim().to_string());
                }
                current.clear();
                has_code = false;
            }
            _ => {
                has_code |= !ch.is_whitespace();
                current.push(ch);
            }
        }
    }

    if has_code {
        statements.push(current.trim().to_string());
    }
    statements
}

/// Whether a `;` at this point falls inside `CREATE TRIGGER ... BEGIN ... END`.
fn in_trigger_body(current: &str) -> bool {
    static TRIGGER: OnceLock<Regex> = OnceLock::new();
    static END: OnceLock<Regex> = OnceLock::new();

    let trigger = TRIGGER.get_or_init(|| {
        Regex::new(r"(?i)^\s*CREATE\s+(?:TEMP\s+|TEMPORARY\s+)?TRIGGER\b")
            .expect("trigger pattern is valid")
    });
    let end = END.get_or_init(|| Regex::new(r"(?i)\bEND\s*$").expect("END pattern is valid"));

    trigger.is_match(current) && !end.is_match(current)
}
