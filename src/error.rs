//! Error types for user-supplied input

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Bad or empty name source, or a file of the wrong type
#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("no valid names found in {origin}")]
    NoNames { origin: &'static str },

    #[error("CSV must contain a first name or last name column (found: {})", format_headers(.headers))]
    MissingColumns { headers: Vec<String> },

    #[error("CSV error on line {line}: {message}")]
    Csv {
        span: Option<Span>,
        line: u64,
        message: String,
    },

    #[error("unsupported {kind} file '{name}' (expected {expected})")]
    UnsupportedFileType {
        kind: &'static str,
        name: String,
        expected: String,
    },
}

impl InputError {
    /// Format the error with source context using ariadne
    ///
    /// Errors without a source position fall back to their display text.
    pub fn format(&self, source: &str, filename: &str) -> String {
        let InputError::Csv {
            span: Some(span),
            message,
            line,
        } = self
        else {
            return self.to_string();
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(format!("malformed CSV row on line {}", line))
            .with_label(
                Label::new((filename, span.clone()))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }

    /// Create an unsupported file type error
    pub fn unsupported_file(
        kind: &'static str,
        name: impl Into<String>,
        expected: &[&str],
    ) -> Self {
        Self::UnsupportedFileType {
            kind,
            name: name.into(),
            expected: expected.join(", "),
        }
    }
}

fn format_headers(headers: &[String]) -> String {
    if headers.is_empty() {
        "no header row".to_string()
    } else {
        headers.join(", ")
    }
}

/// Template or font bytes that cannot be parsed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("template could not be decoded: {0}")]
    Template(String),

    #[error("template has no pages")]
    EmptyTemplate,

    #[error("font could not be decoded: {0}")]
    Font(String),

    #[error("backdrop is not a PNG image")]
    Backdrop,
}
