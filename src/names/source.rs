//! Parsing name sources into records
//!
//! Two formats are supported: CSV with a header row, and free text with one
//! name per line.

use std::path::Path;

use tracing::debug;

use crate::error::{InputError, Span};

use super::record::NameRecord;

/// Header aliases for the first name column, compared case-insensitively
const FIRST_NAME_ALIASES: &[&str] = &["firstname", "first_name", "first name", "name", "vorname"];

/// Header aliases for the last name column, compared case-insensitively
const LAST_NAME_ALIASES: &[&str] = &["lastname", "last_name", "last name", "surname", "nachname"];

/// Format of a name source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameFormat {
    Csv,
    Text,
}

impl NameFormat {
    /// `.csv` files are CSV, everything else is free text
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => NameFormat::Csv,
            _ => NameFormat::Text,
        }
    }
}

/// Parse names in the given format
pub fn parse_names(input: &str, format: NameFormat) -> Result<Vec<NameRecord>, InputError> {
    match format {
        NameFormat::Csv => parse_csv(input),
        NameFormat::Text => parse_text(input),
    }
}

/// Parse CSV with a header row
///
/// At least one of the first/last name columns must be present. Rows where
/// both names are empty are skipped. Unbalanced quotes and rows with more
/// non-empty fields than the header are rejected with the offending line.
pub fn parse_csv(input: &str) -> Result<Vec<NameRecord>, InputError> {
    check_quotes(input)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| csv_error(input, &e))?
        .clone();
    let first_col = find_column(&headers, FIRST_NAME_ALIASES);
    let last_col = find_column(&headers, LAST_NAME_ALIASES);

    if first_col.is_none() && last_col.is_none() {
        return Err(InputError::MissingColumns {
            headers: headers
                .iter()
                .filter(|h| !h.is_empty())
                .map(str::to_string)
                .collect(),
        });
    }

    let mut names = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| csv_error(input, &e))?;
        let extra = row.iter().skip(headers.len()).any(|f| !f.is_empty());
        if extra {
            let (start, line) = row
                .position()
                .map(|p| (p.byte() as usize, p.line()))
                .unwrap_or((0, 0));
            return Err(row_error(
                input,
                start,
                line,
                format!(
                    "row has {} fields but the header has {}",
                    row.len(),
                    headers.len()
                ),
            ));
        }
        let field = |col: Option<usize>| {
            col.and_then(|i| row.get(i))
                .unwrap_or("")
                .trim()
                .to_string()
        };
        let record = NameRecord::new(field(first_col), field(last_col));
        if !record.is_empty() {
            names.push(record);
        }
    }

    if names.is_empty() {
        return Err(InputError::NoNames {
            origin: "CSV input",
        });
    }

    debug!(count = names.len(), "parsed CSV names");
    Ok(names)
}

/// Parse free text: one name per non-blank line
///
/// The first whitespace-separated token is the first name; the remaining
/// tokens, joined by single spaces, form the last name.
pub fn parse_text(input: &str) -> Result<Vec<NameRecord>, InputError> {
    let names: Vec<NameRecord> = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut parts = line.split_whitespace();
            let first = parts.next().unwrap_or("");
            let last = parts.collect::<Vec<_>>().join(" ");
            NameRecord::new(first, last)
        })
        .collect();

    if names.is_empty() {
        return Err(InputError::NoNames {
            origin: "text input",
        });
    }

    debug!(count = names.len(), "parsed text names");
    Ok(names)
}

fn find_column(headers: &csv::StringRecord, aliases: &[&str]) -> Option<usize> {
    headers.iter().position(|header| {
        let normalized = header.trim().to_lowercase();
        aliases.contains(&normalized.as_str())
    })
}

#[derive(Clone, Copy, PartialEq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    /// A quote inside a quoted field: either an escape or the closing quote
    QuoteSeen,
}

/// Reject quoting the csv reader would silently repair
///
/// An unterminated quoted field swallows the rest of the file, and text after
/// a closing quote gets glued onto the field. A quote only opens a field when
/// it is the field's first character; elsewhere it is literal and accepted.
fn check_quotes(input: &str) -> Result<(), InputError> {
    let mut state = QuoteState::FieldStart;
    let mut line = 1_u64;
    let mut line_start = 0;
    // Line on which the open quoted field started
    let mut opened = (1_u64, 0_usize);

    for (i, c) in input.char_indices() {
        state = match (state, c) {
            (QuoteState::FieldStart, '"') => {
                opened = (line, line_start);
                QuoteState::Quoted
            }
            (QuoteState::Quoted, '"') => QuoteState::QuoteSeen,
            (QuoteState::QuoteSeen, '"') => QuoteState::Quoted,
            (QuoteState::Quoted, _) => QuoteState::Quoted,
            (QuoteState::QuoteSeen, ' ' | '\t' | '\r') => QuoteState::QuoteSeen,
            (_, ',' | '\n') => QuoteState::FieldStart,
            (QuoteState::QuoteSeen, other) => {
                return Err(row_error(
                    input,
                    line_start,
                    line,
                    format!("unexpected '{other}' after closing quote"),
                ));
            }
            _ => QuoteState::Unquoted,
        };
        if c == '\n' {
            line += 1;
            line_start = i + 1;
        }
    }

    if state == QuoteState::Quoted {
        let (line, start) = opened;
        return Err(row_error(input, start, line, "unterminated quoted field"));
    }
    Ok(())
}

fn row_error(input: &str, start: usize, line: u64, message: impl Into<String>) -> InputError {
    InputError::Csv {
        span: Some(line_span(input, start)),
        line,
        message: message.into(),
    }
}

fn csv_error(input: &str, err: &csv::Error) -> InputError {
    let position = err.position();
    InputError::Csv {
        span: position.map(|p| line_span(input, p.byte() as usize)),
        line: position.map(|p| p.line()).unwrap_or(0),
        message: err.to_string(),
    }
}

/// Character span of the line starting at byte offset `start`
fn line_span(input: &str, start: usize) -> Span {
    let start = start.min(input.len());
    let end = input[start..]
        .find('\n')
        .map(|offset| start + offset)
        .unwrap_or(input.len());
    let char_start = input
        .get(..start)
        .map(|s| s.chars().count())
        .unwrap_or(0);
    let char_len = input
        .get(start..end)
        .map(|s| s.chars().count())
        .unwrap_or(0);
    char_start..char_start + char_len
}
