//! The output document collaborator driven by the composer

use crate::font::FontResource;
use crate::layout::PageSize;

use super::error::ComposeError;

/// Index of an appended page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageHandle(pub usize);

/// Resource name of an embedded font
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontHandle(pub String);

impl FontHandle {
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// One text run in document space (origin bottom-left, Y up)
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand<'a> {
    pub font: &'a FontHandle,
    /// Text already encoded for the font
    pub text: &'a [u8],
    pub x: f64,
    pub y: f64,
    pub size: f64,
    /// Fill color, components in `0.0..=1.0`
    pub color: [f32; 3],
}

/// A document built from copies of a one-page template
pub trait OutputDocument: Sized {
    /// Decode the template
    fn from_template(bytes: &[u8]) -> Result<Self, ComposeError>;

    /// Size of the template's first page
    fn page_size(&self) -> PageSize;

    /// Append a fresh copy of the template's first page
    fn append_template_page(&mut self) -> Result<PageHandle, ComposeError>;

    fn embed_font(&mut self, font: &FontResource) -> Result<FontHandle, ComposeError>;

    fn draw_text(&mut self, page: PageHandle, command: &DrawCommand<'_>)
        -> Result<(), ComposeError>;

    /// Serialize the document
    fn finish(self) -> Result<Vec<u8>, ComposeError>;
}
