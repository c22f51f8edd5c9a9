//! Document readers for bulk loading.
//!
//! CSV files use their header row as field names, with each value typed as
//! a bool, a number or a string. NDJSON files hold one JSON object per line;
//! blank lines are skipped.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use escli_repository::Document;
use serde_json::{Number, Value};
use tracing::debug;

use crate::cli::CliError;

fn open(path: &Path) -> Result<File, CliError> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => CliError::no_input(path, e),
        _ => CliError::Io(e),
    })
}

/// Read every row of a CSV file as a document.
pub fn read_csv(path: &Path) -> Result<Vec<Document>, CliError> {
    let documents = read_csv_from(open(path)?, &path.display().to_string())?;
    debug!(path = %path.display(), documents = documents.len(), "Read CSV file");
    Ok(documents)
}

/// Read CSV rows from any reader. `source` names the input in error messages.
pub fn read_csv_from<R: Read>(reader: R, source: &str) -> Result<Vec<Document>, CliError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| CliError::input(format!("{}: {}", source, e)))?
        .clone();

    let mut documents = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| CliError::input(format!("{}: {}", source, e)))?;
        let document: Document = headers
            .iter()
            .zip(record.iter())
            .map(|(field, raw)| (field.to_string(), typed_value(raw)))
            .collect();
        documents.push(document);
    }
    Ok(documents)
}

/// Read every line of an NDJSON file as a document.
pub fn read_ndjson(path: &Path) -> Result<Vec<Document>, CliError> {
    let documents = read_ndjson_from(BufReader::new(open(path)?), &path.display().to_string())?;
    debug!(path = %path.display(), documents = documents.len(), "Read NDJSON file");
    Ok(documents)
}

/// Read NDJSON lines from any buffered reader.
pub fn read_ndjson_from<R: BufRead>(reader: R, source: &str) -> Result<Vec<Document>, CliError> {
    let mut documents = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let line_number = i + 1;
        let value: Value = serde_json::from_str(&line)
            .map_err(|e| CliError::input(format!("{}:{}: {}", source, line_number, e)))?;
        documents.push(into_document(value).map_err(|kind| {
            CliError::input(format!(
                "{}:{}: expected a JSON object, found {}",
                source, line_number, kind
            ))
        })?);
    }
    Ok(documents)
}

/// Parse a single document given as JSON text.
pub fn parse_document(text: &str) -> Result<Document, CliError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| CliError::input(format!("Invalid document: {}", e)))?;
    into_document(value).map_err(|kind| {
        CliError::input(format!(
            "Invalid document: expected a JSON object, found {}",
            kind
        ))
    })
}

fn into_document(value: Value) -> Result<Document, &'static str> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Err("null"),
        Value::Bool(_) => Err("a boolean"),
        Value::Number(_) => Err("a number"),
        Value::String(_) => Err("a string"),
        Value::Array(_) => Err("an array"),
    }
}

/// Type a raw CSV value. Empty values become null.
pub fn typed_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    match trimmed {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::Number(n.into());
    }
    // Non-finite floats ("inf", "NaN") have no JSON form and stay strings.
    if let Some(n) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    Value::String(raw.to_string())
}
