//! Configuration for the layout engine

use super::types::PageSize;

/// Default font size in points for freshly loaded entries
pub const DEFAULT_FONT_SIZE: u32 = 24;

/// Line height as a multiple of the font size
pub const DEFAULT_LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Margin around the selection highlight box, in document units
pub const DEFAULT_SELECTION_PADDING: f64 = 10.0;

/// Configuration options for layout computation
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Size of the template page
    pub page: PageSize,

    /// Font size given to every entry on load
    pub default_font_size: u32,

    /// Line height relative to font size
    pub line_height_factor: f64,

    /// Padding around the selection box
    pub selection_padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page: PageSize::A4,
            default_font_size: DEFAULT_FONT_SIZE,
            line_height_factor: DEFAULT_LINE_HEIGHT_FACTOR,
            selection_padding: DEFAULT_SELECTION_PADDING,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size; sizes that are not finite and positive are ignored
    pub fn with_page_size(mut self, width: f64, height: f64) -> Self {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            self.page = PageSize::new(width, height);
        }
        self
    }

    /// Set the default font size; zero is ignored
    pub fn with_default_font_size(mut self, size: u32) -> Self {
        if size > 0 {
            self.default_font_size = size;
        }
        self
    }

    /// Set the line height factor
    pub fn with_line_height_factor(mut self, factor: f64) -> Self {
        self.line_height_factor = factor;
        self
    }

    /// Set the selection padding
    pub fn with_selection_padding(mut self, padding: f64) -> Self {
        self.selection_padding = padding;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LayoutConfig::default();
        assert_eq!(config.page, PageSize::new(595.0, 842.0));
        assert_eq!(config.default_font_size, 24);
        assert_eq!(config.line_height_factor, 1.2);
        assert_eq!(config.selection_padding, 10.0);
    }

    #[test]
    fn test_builder_pattern() {
        let config = LayoutConfig::new()
            .with_page_size(612.0, 792.0)
            .with_default_font_size(0)
            .with_selection_padding(4.0);

        assert_eq!(config.page, PageSize::new(612.0, 792.0));
        assert_eq!(config.default_font_size, 24);
        assert_eq!(config.selection_padding, 4.0);
    }

    #[test]
    fn test_invalid_page_size_is_ignored() {
        let config = LayoutConfig::new()
            .with_page_size(-10.0, 792.0)
            .with_page_size(612.0, f64::NAN)
            .with_page_size(0.0, 0.0);
        assert_eq!(config.page, PageSize::new(595.0, 842.0));
    }
}
