//! # Input Tables
//!
//! Reads the TAZ/Block Group join table into [`RawRow`]s. The format is
//! chosen by file extension:
//!
//! - `.csv`: a header row, then one record per line. Fields are comma
//!   separated and may be wrapped in double quotes (`""` inside quotes is a
//!   literal quote); a quoted field may span lines. Columns are located by
//!   the header names in [`InputConfig`]; other columns are ignored. Blank
//!   lines are skipped, and errors name the line a record starts on.
//! - `.json`: an array of `{ "taz": .., "block_group": .., "population": .. }`.
//!
//! This layer only checks that the table is readable. Missing ids and
//! negative populations are left to the incidence builder, which reports
//! them by record number.

use std::path::Path;

use anyhow::{bail, Context, Result};
use thiserror::Error;

use zonenest_partition::RawRow;

use crate::config::InputConfig;

/// Structural problems with a CSV table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// The file has no header row.
    #[error("input table is empty")]
    Empty,

    /// A configured column is absent from the header.
    #[error("column \"{column}\" not found in header")]
    MissingColumn { column: String },

    /// A record has fewer fields than the columns it must supply.
    #[error("line {line}: expected at least {expected} fields, found {found}")]
    ShortRecord {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A population field is not an integer.
    #[error("line {line}: population \"{value}\" is not an integer")]
    Population { line: usize, value: String },

    /// A quoted field is never closed. `line` is where its record starts.
    #[error("line {line}: unterminated quoted field")]
    UnterminatedQuote { line: usize },
}

/// Read an input table, dispatching on the file extension.
pub fn read_rows(path: &Path, columns: &InputConfig) -> Result<Vec<RawRow>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading input: {}", path.display()))?;

    let rows = match extension.as_deref() {
        Some("csv") => parse_csv(&content, columns),
        Some("json") => serde_json::from_str(&content).map_err(anyhow::Error::from),
        _ => bail!(
            "unsupported input format: {} (expected .csv or .json)",
            path.display()
        ),
    }
    .with_context(|| format!("parsing input: {}", path.display()))?;

    tracing::info!(path = %path.display(), records = rows.len(), "read input table");
    Ok(rows)
}

/// Parse CSV text with a header row.
pub fn parse_csv(content: &str, columns: &InputConfig) -> Result<Vec<RawRow>> {
    let mut records = split_records(content)?.into_iter();

    let header = records.next().ok_or(InputError::Empty)?.fields;
    let locate = |name: &str| {
        header
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| InputError::MissingColumn {
                column: name.to_string(),
            })
    };
    let taz_at = locate(&columns.taz_column)?;
    let block_group_at = locate(&columns.block_group_column)?;
    let population_at = locate(&columns.population_column)?;
    let needed = taz_at.max(block_group_at).max(population_at) + 1;

    let mut rows = Vec::new();
    for Record { line, fields } in records {
        if fields.len() < needed {
            return Err(InputError::ShortRecord {
                line,
                expected: needed,
                found: fields.len(),
            }
            .into());
        }
        let raw_population = fields[population_at].trim();
        let population = raw_population
            .parse::<i64>()
            .map_err(|_| InputError::Population {
                line,
                value: raw_population.to_string(),
            })?;
        rows.push(RawRow {
            taz: non_blank(&fields[taz_at]),
            block_group: non_blank(&fields[block_group_at]),
            population,
        });
    }
    Ok(rows)
}

fn non_blank(field: &str) -> Option<String> {
    let trimmed = field.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// One CSV record and the 1-based line it starts on.
struct Record {
    line: usize,
    fields: Vec<String>,
}

/// Split CSV text into records, honouring double quotes.
///
/// Line breaks inside quotes belong to the field. A `\r` directly before a
/// record-ending `\n` is dropped. Lines holding only whitespace are skipped.
fn split_records(content: &str) -> Result<Vec<Record>, InputError> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut line = 1;
    let mut start = 1;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            ('"', true) => in_quotes = false,
            ('"', false) if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
                quoted = true;
            }
            (',', false) => fields.push(std::mem::take(&mut field)),
            ('\r', false) if chars.peek() == Some(&'\n') => {}
            ('\n', false) => {
                fields.push(std::mem::take(&mut field));
                push_record(&mut records, start, std::mem::take(&mut fields), quoted);
                quoted = false;
                line += 1;
                start = line;
            }
            ('\n', true) => {
                field.push(c);
                line += 1;
            }
            _ => field.push(c),
        }
    }
    if in_quotes {
        return Err(InputError::UnterminatedQuote { line: start });
    }
    fields.push(field);
    push_record(&mut records, start, fields, quoted);
    Ok(records)
}

fn push_record(records: &mut Vec<Record>, line: usize, fields: Vec<String>, quoted: bool) {
    let blank = !quoted && fields.len() == 1 && fields[0].trim().is_empty();
    if !blank {
        records.push(Record { line, fields });
    }
}
