//! Configuration for the SVG preview

use crate::layout::PageSize;

use super::transform::ScreenTransform;

/// Width of the preview surface in pixels
pub const DEFAULT_CANVAS_WIDTH: f64 = 800.0;

/// Configuration options for SVG output
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewConfig {
    /// Surface width; the page is scaled to fit it
    pub canvas_width: f64,

    /// Whether to include XML declaration and standalone attributes
    pub standalone: bool,

    /// Whether to format output with indentation
    pub pretty_print: bool,

    /// Prefix for CSS class names (e.g., "nc-" for "nc-entry")
    pub class_prefix: Option<String>,

    /// Font family used for preview text
    pub font_family: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            standalone: true,
            pretty_print: true,
            class_prefix: Some("nc-".to_string()),
            font_family: "Helvetica, Arial, sans-serif".to_string(),
        }
    }
}

impl PreviewConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Transform that fits `page` to the surface width
    pub fn transform(&self, page: PageSize) -> ScreenTransform {
        ScreenTransform::fit_width(page, self.canvas_width)
    }

    /// Set the surface width; non-positive widths are ignored
    pub fn with_canvas_width(mut self, width: f64) -> Self {
        if width > 0.0 {
            self.canvas_width = width;
        }
        self
    }

    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Set the CSS class prefix
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    /// Remove the CSS class prefix
    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }
}
