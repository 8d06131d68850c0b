//! Namecards - lay out names on a quadrant template and print them
//!
//! Names are placed one per quadrant of a one-page template, four to a page.
//! Each placement can be moved, resized, spaced and re-typed through the
//! layout model, previewed as SVG, and composed into a multi-page PDF.
//!
//! # Example
//!
//! ```rust
//! use namecards::{load_model, render_preview, FontResource, NameFormat, NamecardConfig};
//!
//! let config = NamecardConfig::default();
//! let model = load_model("Ada Lovelace\nAlan Turing\n", NameFormat::Text, &config).unwrap();
//! assert_eq!(model.len(), 2);
//! assert_eq!(model.page_count(), 1);
//!
//! let svg = render_preview(&model, 0, &config, &FontResource::helvetica(), None).unwrap();
//! assert!(svg.contains("Lovelace"));
//! ```

pub mod compose;
pub mod config;
pub mod edits;
pub mod error;
pub mod font;
pub mod layout;
pub mod names;
pub mod renderer;
pub mod stylesheet;

pub use compose::{ComposeError, ComposeOutput, ComposeState, OutputComposer, PdfDocument};
pub use config::{ConfigError, NamecardConfig};
pub use edits::{Edit, EditScript};
pub use error::{DecodeError, InputError};
pub use font::{FontKind, FontResource};
pub use layout::{LayoutConfig, LayoutError, LayoutModel, Point, Quadrant};
pub use names::{NameFormat, NameRecord, NameRecordStore};
pub use renderer::{Backdrop, PointerSession, PreviewConfig, PreviewFont, PreviewRenderer};
pub use stylesheet::{Stylesheet, StylesheetError};

use thiserror::Error;
use tracing::info;

/// Errors that can occur anywhere in the namecard pipeline
#[derive(Debug, Error)]
pub enum NamecardError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Compose(#[from] ComposeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Stylesheet(#[from] StylesheetError),
}

/// Parse a name source and build a layout model with default placements
pub fn load_model(
    source: &str,
    format: NameFormat,
    config: &NamecardConfig,
) -> Result<LayoutModel, NamecardError> {
    let records = NameRecordStore::from_records(names::parse_names(source, format)?);
    let mut model = LayoutModel::new(config.layout.clone());
    model.load_records(&records);
    info!(
        names = model.len(),
        pages = model.page_count(),
        "loaded names"
    );
    Ok(model)
}

/// Render one page of the model as an SVG preview
///
/// A custom `font` is inlined into the SVG so the text is drawn with the
/// same widths it was laid out with.
pub fn render_preview(
    model: &LayoutModel,
    page: usize,
    config: &NamecardConfig,
    font: &FontResource,
    backdrop: Option<&Backdrop>,
) -> Result<String, NamecardError> {
    let renderer = PreviewRenderer::new(font, config.preview.clone(), config.stylesheet.clone())
        .with_font(font);
    Ok(renderer.render(model, page, backdrop)?)
}

/// Compose the final PDF from the model and a template
pub fn compose_pdf(
    model: &LayoutModel,
    template: &[u8],
    custom_font: Option<&[u8]>,
    config: &NamecardConfig,
) -> Result<ComposeOutput, NamecardError> {
    let mut composer = OutputComposer::new(&config.stylesheet);
    Ok(composer.compose::<PdfDocument>(model, template, custom_font)?)
}
