//! Output composition
//!
//! The [`OutputComposer`] turns the layout model into a multi-page document:
//! one copy of the template page per four names, with each name drawn by the
//! same text layout engine the preview uses. The document itself is behind
//! the [`OutputDocument`] trait; [`PdfDocument`] is the shipped backend.

pub mod document;
pub mod error;
pub mod pdf;

use std::fmt;

use tracing::{debug, info, warn};

pub use document::{DrawCommand, FontHandle, OutputDocument, PageHandle};
pub use error::ComposeError;
pub use pdf::PdfDocument;

use crate::font::{encode_text, FontKind, FontResource};
use crate::layout::{LayoutModel, PageSize, TextLayoutEngine};
use crate::stylesheet::{Stylesheet, TEXT};

/// Tolerance when comparing the template page with the configured page size
const PAGE_SIZE_TOLERANCE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub enum ComposeState {
    Idle,
    Composing,
    Done { pages: usize },
    Failed { message: String },
}

impl fmt::Display for ComposeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComposeState::Idle => write!(f, "idle"),
            ComposeState::Composing => write!(f, "composing"),
            ComposeState::Done { pages } => write!(f, "done ({pages} pages)"),
            ComposeState::Failed { message } => write!(f, "failed: {message}"),
        }
    }
}

/// A finished document and what went into it
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeOutput {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Font the names were drawn with
    pub font: FontKind,
    /// Non-fatal problems, such as a custom font that had to be replaced
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct OutputComposer {
    state: ComposeState,
    text_color: [f32; 3],
}

impl Default for OutputComposer {
    fn default() -> Self {
        Self::new(&Stylesheet::default())
    }
}

impl OutputComposer {
    /// Composer drawing text in the stylesheet's text color
    pub fn new(stylesheet: &Stylesheet) -> Self {
        Self {
            state: ComposeState::Idle,
            text_color: stylesheet.rgb(TEXT),
        }
    }

    pub fn state(&self) -> &ComposeState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state == ComposeState::Composing
    }

    /// Build the output document for every entry in `model`
    ///
    /// A custom font that cannot be decoded or embedded is replaced by
    /// Helvetica and reported in [`ComposeOutput::warnings`]. Any other failure
    /// aborts the compose and leaves the composer in [`ComposeState::Failed`].
    pub fn compose<D: OutputDocument>(
        &mut self,
        model: &LayoutModel,
        template: &[u8],
        custom_font: Option<&[u8]>,
    ) -> Result<ComposeOutput, ComposeError> {
        self.state = ComposeState::Composing;
        debug!(entries = model.len(), "compose started");

        match self.run::<D>(model, template, custom_font) {
            Ok(output) => {
                info!(
                    pages = output.page_count,
                    font = %output.font,
                    bytes = output.bytes.len(),
                    "composed namecards"
                );
                self.state = ComposeState::Done {
                    pages: output.page_count,
                };
                Ok(output)
            }
            Err(err) => {
                warn!(error = %err, "compose failed");
                self.state = ComposeState::Failed {
                    message: err.to_string(),
                };
                Err(err)
            }
        }
    }

    fn run<D: OutputDocument>(
        &self,
        model: &LayoutModel,
        template: &[u8],
        custom_font: Option<&[u8]>,
    ) -> Result<ComposeOutput, ComposeError> {
        if model.is_empty() {
            return Err(ComposeError::NothingToCompose);
        }

        let mut document = D::from_template(template)?;
        let mut warnings = Vec::new();

        let template_size = document.page_size();
        if !same_size(template_size, model.page_size()) {
            let message = format!(
                "template page is {}x{} but names are laid out for {}x{}",
                template_size.width,
                template_size.height,
                model.page_size().width,
                model.page_size().height
            );
            warn!("{message}");
            warnings.push(message);
        }

        let (font, font_handle) = resolve_font(&mut document, custom_font, &mut warnings)?;
        let engine = TextLayoutEngine::new(model.config());
        let page_count = model.page_count();

        for page in 0..page_count {
            let handle = document.append_template_page()?;
            for index in model.entries_on_page(page) {
                let Some(entry) = model.entry(index) else {
                    continue;
                };
                let size = f64::from(entry.font_size);
                for run in engine.layout(&entry.text_block(), font.metrics()) {
                    let text = encode_text(&run.text);
                    document.draw_text(
                        handle,
                        &DrawCommand {
                            font: &font_handle,
                            text: &text,
                            x: run.x,
                            y: run.y,
                            size,
                            color: self.text_color,
                        },
                    )?;
                }
            }
            debug!(page, "composed page");
        }

        let bytes = document.finish()?;
        Ok(ComposeOutput {
            bytes,
            page_count,
            font: font.kind(),
            warnings,
        })
    }
}

/// Embed the custom font if it is usable, otherwise Helvetica
fn resolve_font<D: OutputDocument>(
    document: &mut D,
    custom_font: Option<&[u8]>,
    warnings: &mut Vec<String>,
) -> Result<(FontResource, FontHandle), ComposeError> {
    if let Some(bytes) = custom_font {
        let embedded = FontResource::from_bytes(bytes)
            .map_err(ComposeError::from)
            .and_then(|font| document.embed_font(&font).map(|handle| (font, handle)));
        match embedded {
            Ok(resolved) => return Ok(resolved),
            Err(err) => {
                warn!(error = %err, "custom font unusable, falling back to Helvetica");
                warnings.push(format!("custom font not used ({err}); fell back to Helvetica"));
            }
        }
    }

    let font = FontResource::helvetica();
    let handle = document.embed_font(&font)?;
    Ok((font, handle))
}

fn same_size(a: PageSize, b: PageSize) -> bool {
    (a.width - b.width).abs() <= PAGE_SIZE_TOLERANCE
        && (a.height - b.height).abs() <= PAGE_SIZE_TOLERANCE
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::DecodeError;
    use crate::layout::LayoutConfig;
    use crate::names::{NameRecord, NameRecordStore};

    /// Records every call instead of producing a real document
    #[derive(Debug, Default)]
    struct RecordingDocument {
        pages: usize,
        fonts: Vec<String>,
        draws: Vec<(usize, String, String, f64, f64, f64)>,
    }

    impl OutputDocument for RecordingDocument {
        fn from_template(bytes: &[u8]) -> Result<Self, ComposeError> {
            if bytes == b"broken" {
                return Err(DecodeError::Template("unexpected end of file".to_string()).into());
            }
            Ok(Self::default())
        }

        fn page_size(&self) -> PageSize {
            PageSize::A4
        }

        fn append_template_page(&mut self) -> Result<PageHandle, ComposeError> {
            self.pages += 1;
            Ok(PageHandle(self.pages - 1))
        }

        fn embed_font(&mut self, font: &FontResource) -> Result<FontHandle, ComposeError> {
            self.fonts.push(font.base_font_name().to_string());
            Ok(FontHandle(format!("F{}", self.fonts.len())))
        }

        fn draw_text(
            &mut self,
            page: PageHandle,
            command: &DrawCommand<'_>,
        ) -> Result<(), ComposeError> {
            self.draws.push((
                page.0,
                command.font.name().to_string(),
                String::from_utf8_lossy(command.text).into_owned(),
                command.x,
                command.y,
                command.size,
            ));
            Ok(())
        }

        fn finish(self) -> Result<Vec<u8>, ComposeError> {
            let mut lines = vec![format!("pages={}", self.pages)];
            for (page, font, text, x, y, size) in &self.draws {
                lines.push(format!(
                    "page {page} {font}: '{text}' at ({x:.2}, {y:.2}) size {size}"
                ));
            }
            Ok(lines.join("\n").into_bytes())
        }
    }

    fn model_of(names: &[(&str, &str)]) -> LayoutModel {
        let records: NameRecordStore = names
            .iter()
            .map(|(first, last)| NameRecord::new(*first, *last))
            .collect();
        let mut model = LayoutModel::new(LayoutConfig::default());
        model.load_records(&records);
        model
    }

    fn transcript(output: &ComposeOutput) -> String {
        String::from_utf8_lossy(&output.bytes).into_owned()
    }

    #[test]
    fn test_runs_use_document_coordinates() {
        let model = model_of(&[("Max", "Power")]);
        let mut composer = OutputComposer::default();
        let output = composer
            .compose::<RecordingDocument>(&model, b"template", None)
            .unwrap();

        insta::assert_snapshot!(transcript(&output), @r"
        pages=1
        page 0 F1: 'Max' at (126.08, 645.90) size 24
        page 0 F1: 'Power' at (114.74, 617.10) size 24
        ");
        assert_eq!(output.font, FontKind::Standard);
        assert!(output.warnings.is_empty());
        assert_eq!(composer.state(), &ComposeState::Done { pages: 1 });
    }

    #[test]
    fn test_one_template_page_per_four_names() {
        let names: Vec<(String, String)> = (0..9)
            .map(|i| (format!("First{i}"), format!("Last{i}")))
            .collect();
        let refs: Vec<(&str, &str)> = names.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
        let model = model_of(&refs);

        let output = OutputComposer::default()
            .compose::<RecordingDocument>(&model, b"template", None)
            .unwrap();
        assert_eq!(output.page_count, 3);

        let text = transcript(&output);
        assert!(text.starts_with("pages=3"));
        assert_eq!(text.matches("page 0 ").count(), 8);
        assert_eq!(text.matches("page 1 ").count(), 8);
        assert_eq!(text.matches("page 2 ").count(), 2);
    }

    #[test]
    fn test_letter_spacing_draws_characters() {
        let mut model = model_of(&[("Ida", "")]);
        model.set_letter_spacing(0, 5).unwrap();
        let output = OutputComposer::default()
            .compose::<RecordingDocument>(&model, b"template", None)
            .unwrap();
        let text = transcript(&output);
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("'I'"));
        assert!(text.contains("'d'"));
        assert!(text.contains("'a'"));
    }

    #[test]
    fn test_corrupt_font_falls_back_to_helvetica() {
        let model = model_of(&[("Ada", "Lovelace")]);
        let mut composer = OutputComposer::default();
        let output = composer
            .compose::<RecordingDocument>(&model, b"template", Some(b"not a font at all"))
            .unwrap();

        assert_eq!(output.font, FontKind::Standard);
        assert_eq!(output.warnings.len(), 1);
        assert!(output.warnings[0].contains("Helvetica"));
        assert_eq!(composer.state(), &ComposeState::Done { pages: 1 });
    }

    #[test]
    fn test_custom_font_widths_position_runs() {
        let model = model_of(&[("Max", "Power")]);
        let mut composer = OutputComposer::default();
        let output = composer
            .compose::<RecordingDocument>(
                &model,
                b"template",
                Some(include_bytes!("../../tests/fixtures/namecards-test.ttf")),
            )
            .unwrap();

        insta::assert_snapshot!(transcript(&output), @r"
        pages=1
        page 0 F1: 'Max' at (128.35, 645.90) size 24
        page 0 F1: 'Power' at (116.35, 617.10) size 24
        ");
        assert_eq!(output.font, FontKind::Custom);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_template_failure_leaves_failed_state() {
        let model = model_of(&[("Ada", "Lovelace")]);
        let mut composer = OutputComposer::default();
        let err = composer
            .compose::<RecordingDocument>(&model, b"broken", None)
            .unwrap_err();

        assert!(matches!(err, ComposeError::Decode(DecodeError::Template(_))));
        assert_eq!(
            composer.state(),
            &ComposeState::Failed {
                message: "template could not be decoded: unexpected end of file".to_string()
            }
        );
        assert!(!composer.is_busy());
    }

    #[test]
    fn test_empty_model_is_an_error() {
        let model = LayoutModel::new(LayoutConfig::default());
        let mut composer = OutputComposer::default();
        assert_eq!(
            composer.compose::<RecordingDocument>(&model, b"template", None),
            Err(ComposeError::NothingToCompose)
        );
    }

    #[test]
    fn test_page_size_mismatch_is_a_warning() {
        let records = NameRecordStore::from_records(vec![NameRecord::new("Ada", "L")]);
        let mut model = LayoutModel::new(LayoutConfig::default().with_page_size(612.0, 792.0));
        model.load_records(&records);
        let output = OutputComposer::default()
            .compose::<RecordingDocument>(&model, b"template", None)
            .unwrap();
        assert_eq!(output.warnings.len(), 1);
        assert!(output.warnings[0].contains("595x842"));
    }
}
