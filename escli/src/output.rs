//! Rendering of command results.

use std::io::{self, Write};

use colored::Colorize;
use escli_repository::Document;
use serde::Serialize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::{Padding, Style};

use crate::cli::CliError;

/// Write a value as JSON with 2-space indentation, followed by a newline.
pub fn write_json<W, T>(out: &mut W, value: &T) -> io::Result<()>
where
    W: Write + ?Sized,
    T: Serialize + ?Sized,
{
    let rendered = serde_json::to_string_pretty(value).map_err(io::Error::from)?;
    writeln!(out, "{}", rendered)
}

/// Render a JSON value as a table cell. Strings are shown without quotes.
pub fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A plain text table with a header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table from documents, one column per field in first-seen order.
    pub fn from_documents(documents: &[Document]) -> Self {
        let mut headers: Vec<String> = Vec::new();
        for document in documents {
            for key in document.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }

        let rows = documents
            .iter()
            .map(|document| {
                headers
                    .iter()
                    .map(|header| document.get(header).map(cell).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the table as left-aligned columns separated by two spaces.
    pub fn write<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        let mut builder = Builder::default();
        builder.push_record(self.headers.clone());
        for row in &self.rows {
            builder.push_record(row.clone());
        }

        let mut table = builder.build();
        table.with(Style::empty()).with(Padding::new(0, 2, 0, 0));

        // The last column keeps its right padding; drop it.
        for line in table.to_string().lines() {
            writeln!(out, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

/// Print an error to stderr as `error: <message>`.
pub fn print_error(err: &CliError) {
    eprintln!("{} {}", "error:".red().bold(), err);
}
