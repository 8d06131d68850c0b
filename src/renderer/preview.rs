//! Preview rendering and hit testing for one page of namecards

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::debug;

use crate::error::DecodeError;
use crate::font::{FontProgram, FontResource};
use crate::layout::{
    quadrant_at, quadrant_specs, BoundingBox, LayoutError, LayoutModel, Point, TextLayoutEngine,
    TextMeasure,
};
use crate::stylesheet::Stylesheet;

use super::svg::SvgBuilder;
use super::transform::{ScreenTransform, SurfaceMeasure};
use super::PreviewConfig;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Raster image of the template page drawn behind the names
#[derive(Debug, Clone, PartialEq)]
pub struct Backdrop {
    png: Vec<u8>,
}

impl Backdrop {
    pub fn from_png(bytes: Vec<u8>) -> Result<Self, DecodeError> {
        if !bytes.starts_with(&PNG_SIGNATURE) {
            return Err(DecodeError::Backdrop);
        }
        Ok(Self { png: bytes })
    }

    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

/// A custom font carried into the preview as an `@font-face` rule
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewFont {
    family: String,
    program: FontProgram,
    data: Vec<u8>,
}

impl PreviewFont {
    /// `None` for the built-in font, which the viewer already has
    pub fn from_resource(font: &FontResource) -> Option<Self> {
        font.embedded().map(|decoded| Self {
            family: decoded.postscript_name.clone(),
            program: decoded.program,
            data: decoded.data.clone(),
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// CSS `src` value with the font program inlined
    pub fn src(&self) -> String {
        let (mime, format) = match self.program {
            FontProgram::TrueType => ("font/ttf", "truetype"),
            FontProgram::OpenTypeCff => ("font/otf", "opentype"),
        };
        format!(
            "url(data:{mime};base64,{}) format(\"{format}\")",
            STANDARD.encode(&self.data)
        )
    }
}

/// Whether an entry's anchor lies outside its default quadrant
pub fn is_out_of_home(model: &LayoutModel, index: usize) -> bool {
    let page = model.page_size();
    model
        .entry(index)
        .map(|entry| quadrant_at(entry.anchor, page.width, page.height) != model.default_quadrant(index))
        .unwrap_or(false)
}

/// Draws pages of a layout model as SVG and maps pointer positions back to entries
pub struct PreviewRenderer<M> {
    config: PreviewConfig,
    stylesheet: Stylesheet,
    measure: M,
    font: Option<PreviewFont>,
}

impl<M: TextMeasure> PreviewRenderer<M> {
    pub fn new(measure: M, config: PreviewConfig, stylesheet: Stylesheet) -> Self {
        Self {
            config,
            stylesheet,
            measure,
            font: None,
        }
    }

    /// Draw text in `font` so the surface matches the metrics it was measured with
    pub fn with_font(mut self, font: &FontResource) -> Self {
        self.font = PreviewFont::from_resource(font);
        self
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// Transform between the model's page and the surface
    pub fn transform(&self, model: &LayoutModel) -> ScreenTransform {
        self.config.transform(model.page_size())
    }

    /// Map a surface position (y down, canvas units) into document space
    pub fn to_document(&self, model: &LayoutModel, point: Point) -> Point {
        self.transform(model).to_document(point)
    }

    fn surface_measure(&self, transform: &ScreenTransform) -> SurfaceMeasure<&M> {
        SurfaceMeasure::new(&self.measure, transform.scale())
    }

    /// Render one page to an SVG document
    pub fn render(
        &self,
        model: &LayoutModel,
        page: usize,
        backdrop: Option<&Backdrop>,
    ) -> Result<String, LayoutError> {
        if page >= model.page_count() {
            return Err(LayoutError::unknown_page(page, model.page_count()));
        }

        let size = model.page_size();
        let transform = self.transform(model);
        let measure = self.surface_measure(&transform);
        let engine = TextLayoutEngine::new(model.config());
        let width = transform.length(size.width);
        let height = transform.length(size.height);

        let mut svg_config = self.config.clone();
        if let Some(font) = &self.font {
            let family = format!("\"{}\", {}", font.family(), self.config.font_family);
            svg_config = svg_config.with_font_family(family);
        }
        let mut builder = SvgBuilder::new(svg_config);
        if let Some(font) = &self.font {
            builder.add_font_face(font.family(), &font.src());
        }
        builder.add_stylesheet(&self.stylesheet);
        builder.add_rect(0.0, 0.0, width, height, &["background"]);
        if let Some(backdrop) = backdrop {
            builder.add_image(&backdrop.data_uri(), 0.0, 0.0, width, height, &["template"]);
        }

        for spec in quadrant_specs(size) {
            let (x, y, w, h) = screen_rect(&transform, &spec.bounds);
            builder.add_rect(x, y, w, h, &["quadrant"]);
        }

        for index in model.entries_on_page(page) {
            let Some(entry) = model.entry(index) else {
                continue;
            };
            let selected = model.selected() == Some(index);
            let mut classes = vec!["entry"];
            if selected {
                classes.push("selected");
            }
            if is_out_of_home(model, index) {
                classes.push("out-of-bounds");
            }

            let id = format!("entry-{index}");
            builder.start_group(Some(&id), &classes);
            let block = entry.text_block();
            let font_size = transform.length(f64::from(entry.font_size));
            for run in engine.layout(&block, &measure) {
                let p = transform.to_screen(Point::new(run.x, run.y));
                builder.add_text(&run.text, p.x, p.y, font_size, &["text"]);
            }
            if selected {
                let bounds = engine.selection_bounds(&block, &measure);
                let (x, y, w, h) = screen_rect(&transform, &bounds);
                builder.add_rect(x, y, w, h, &["selection"]);
            }
            builder.end_group();
        }

        debug!(page, entries = model.entries_on_page(page).len(), "rendered preview page");
        Ok(builder.build(width, height))
    }

    /// Topmost entry on `page` whose selection box contains `point` (document space)
    ///
    /// Entries drawn later win, so the search runs in reverse drawing order.
    pub fn hit_test(&self, model: &LayoutModel, page: usize, point: Point) -> Option<usize> {
        let transform = self.transform(model);
        let measure = self.surface_measure(&transform);
        let engine = TextLayoutEngine::new(model.config());
        model.entries_on_page(page).rev().find(|&index| {
            model
                .entry(index)
                .map(|entry| engine.selection_bounds(&entry.text_block(), &measure).contains(point))
                .unwrap_or(false)
        })
    }
}

/// Surface rectangle `(x, y, width, height)` for a document-space box
fn screen_rect(transform: &ScreenTransform, bounds: &BoundingBox) -> (f64, f64, f64, f64) {
    let top_left = transform.to_screen(Point::new(bounds.x, bounds.top()));
    (
        top_left.x,
        top_left.y,
        transform.length(bounds.width),
        transform.length(bounds.height),
    )
}
