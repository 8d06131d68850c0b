//! Error types for output composition

use thiserror::Error;

use crate::error::DecodeError;

/// Failures while building the output document. Any of them aborts the compose.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ComposeError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("there are no names to compose")]
    NothingToCompose,

    #[error("failed to copy template page: {0}")]
    PageCopy(String),

    #[error("failed to embed font '{font}': {message}")]
    FontEmbed { font: String, message: String },

    #[error("failed to draw text: {0}")]
    Draw(String),

    #[error("failed to write output document: {0}")]
    Serialize(String),
}

impl ComposeError {
    pub fn font_embed(font: impl Into<String>, message: impl ToString) -> Self {
        Self::FontEmbed {
            font: font.into(),
            message: message.to_string(),
        }
    }
}
