//! Table view of an analysis result.
//!
//! Columns come from the keys of the first row. Every row is looked up by
//! those keys, so a row missing a key gets an empty cell and keys that only
//! appear in later rows are not shown.

use crate::domain::model::AnalysisResult;
use serde_json::Value;
use std::fmt::Write;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Display text of one cell.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

impl Table {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let headers = result.columns();
        let rows = result
            .rows
            .iter()
            .map(|row| headers.iter().map(|h| cell_text(row.get(h))).collect())
            .collect();

        Self { headers, rows }
    }

    pub fn ncols(&self) -> usize {
        self.headers.len()
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Aligned plain text for the terminal.
    pub fn render_text(&self) -> String {
        if self.headers.is_empty() {
            return if self.rows.is_empty() {
                String::from("(no rows)\n")
            } else {
                format!("({} rows with no columns)\n", self.rows.len())
            };
        }

        let widths = self.column_widths();
        let mut out = String::new();

        let write_line = |out: &mut String, cells: &[String]| {
            let line = cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| pad(cell, *width))
                .collect::<Vec<_>>()
                .join(" | ");
            out.push_str(line.trim_end());
            out.push('\n');
        };

        write_line(&mut out, &self.headers);
        let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-");
        out.push_str(&rule);
        out.push('\n');
        for row in &self.rows {
            write_line(&mut out, row);
        }

        out
    }

    /// A standalone `<table>` element.
    pub fn render_html(&self) -> String {
        let mut out = String::from("<table>\n  <thead>\n    <tr>");
        for header in &self.headers {
            let _ = write!(out, "<th>{}</th>", escape_html(header));
        }
        out.push_str("</tr>\n  </thead>\n  <tbody>\n");
        for row in &self.rows {
            out.push_str("    <tr>");
            for cell in row {
                let _ = write!(out, "<td>{}</td>", escape_html(cell));
            }
            out.push_str("</tr>\n");
        }
        out.push_str("  </tbody>\n</table>\n");
        out
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let mut padded = String::with_capacity(text.len() + width.saturating_sub(len));
    padded.push_str(text);
    padded.extend(std::iter::repeat(' ').take(width.saturating_sub(len)));
    padded
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
