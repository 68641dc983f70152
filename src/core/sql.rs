//! Rendering of literal SQL for the review-then-apply scripts.
//!
//! Generated files are meant to be read by a person before they are run,
//! so every value is rendered inline rather than bound.

use std::fmt::Display;

/// Quote a string literal, doubling embedded single quotes.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Render an optional value, `NULL` when absent.
pub fn or_null<T: Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "NULL".to_string())
}

/// Text safe to put after `--`: line breaks would end the comment and
/// let the rest run as SQL.
pub fn comment_text(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

/// A single `VALUES` tuple with an optional trailing `--` comment.
#[derive(Debug, Clone)]
pub struct ValuesRow {
    pub values: Vec<String>,
    pub comment: Option<String>,
}

impl ValuesRow {
    pub fn new(values: Vec<String>) -> Self {
        Self {
            values,
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Render `rows` as an indented VALUES list: every tuple but the last ends
/// with `,`, the last with `;`, and comments follow the separator.
pub fn render_values(rows: &[ValuesRow]) -> String {
    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        let sep = if i + 1 < rows.len() { ',' } else { ';' };
        out.push_str(&format!("  ({}){}", row.values.join(", "), sep));
        if let Some(comment) = &row.comment {
            out.push_str(&format!("  -- {}", comment_text(comment)));
        }
        out.push('\n');
    }
    out
}
