//! Error types for the layout model

use thiserror::Error;

/// Errors that can occur while mutating the layout model
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    /// Index does not name a loaded entry
    #[error("no entry at index {index} ({count} entries loaded)")]
    UnknownEntry { index: usize, count: usize },

    /// Page index past the last page
    #[error("page {page} out of range ({count} pages)")]
    UnknownPage { page: usize, count: usize },

    /// Anchor coordinate that is NaN or infinite
    #[error("anchor ({x}, {y}) for entry {index} is not a finite point")]
    NonFiniteAnchor { index: usize, x: f64, y: f64 },
}

impl LayoutError {
    /// Create an unknown entry error
    pub fn unknown_entry(index: usize, count: usize) -> Self {
        Self::UnknownEntry { index, count }
    }

    /// Create an unknown page error
    pub fn unknown_page(page: usize, count: usize) -> Self {
        Self::UnknownPage { page, count }
    }
}
