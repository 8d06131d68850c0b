//! TOML configuration for layout, preview and colors
//!
//! Every table and field is optional; anything left out keeps its default.
//!
//! ```toml
//! [page]
//! width = 595
//! height = 842
//!
//! [text]
//! font_size = 24
//! line_height = 1.2
//! selection_padding = 10
//!
//! [preview]
//! canvas_width = 800
//!
//! [colors]
//! selection = "#32b8c6"
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::layout::{LayoutConfig, LayoutError};
use crate::renderer::PreviewConfig;
use crate::stylesheet::Stylesheet;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },

    #[error("edit #{position} failed: {source}")]
    Edit {
        position: usize,
        #[source]
        source: LayoutError,
    },
}

impl ConfigError {
    pub(crate) fn read(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// Everything configurable outside the CLI flags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamecardConfig {
    pub layout: LayoutConfig,
    pub preview: PreviewConfig,
    pub stylesheet: Stylesheet,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    #[serde(default)]
    page: TomlPage,
    #[serde(default)]
    text: TomlText,
    #[serde(default)]
    preview: TomlPreview,
    #[serde(default)]
    colors: HashMap<String, String>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlPage {
    width: Option<f64>,
    height: Option<f64>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlText {
    font_size: Option<u32>,
    line_height: Option<f64>,
    selection_padding: Option<f64>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlPreview {
    canvas_width: Option<f64>,
    standalone: Option<bool>,
    pretty_print: Option<bool>,
    class_prefix: Option<String>,
    font_family: Option<String>,
}

impl NamecardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_preview(mut self, preview: PreviewConfig) -> Self {
        self.preview = preview;
        self
    }

    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let mut config = Self::default();

        let page = config.layout.page;
        let width = positive("page.width", parsed.page.width.unwrap_or(page.width))?;
        let height = positive("page.height", parsed.page.height.unwrap_or(page.height))?;
        config.layout = config.layout.with_page_size(width, height);

        if let Some(size) = parsed.text.font_size {
            if size == 0 {
                return Err(ConfigError::invalid("text.font_size", "must be at least 1"));
            }
            config.layout = config.layout.with_default_font_size(size);
        }
        if let Some(factor) = parsed.text.line_height {
            config.layout = config
                .layout
                .with_line_height_factor(positive("text.line_height", factor)?);
        }
        if let Some(padding) = parsed.text.selection_padding {
            if !padding.is_finite() || padding < 0.0 {
                return Err(ConfigError::invalid(
                    "text.selection_padding",
                    "must not be negative",
                ));
            }
            config.layout = config.layout.with_selection_padding(padding);
        }

        let preview = parsed.preview;
        if let Some(width) = preview.canvas_width {
            config.preview = config
                .preview
                .with_canvas_width(positive("preview.canvas_width", width)?);
        }
        if let Some(standalone) = preview.standalone {
            config.preview = config.preview.with_standalone(standalone);
        }
        if let Some(pretty) = preview.pretty_print {
            config.preview = config.preview.with_pretty_print(pretty);
        }
        match preview.class_prefix.as_deref() {
            Some("") => config.preview = config.preview.without_class_prefix(),
            Some(prefix) => config.preview = config.preview.with_class_prefix(prefix),
            None => {}
        }
        if let Some(family) = preview.font_family {
            config.preview = config.preview.with_font_family(family);
        }

        config.stylesheet = Stylesheet::from_colors(None, parsed.colors);
        Ok(config)
    }
}

fn positive(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::invalid(field, format!("must be positive, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout::PageSize;
    use crate::stylesheet::{SELECTION, TEXT};

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(NamecardConfig::from_str("").unwrap(), NamecardConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = NamecardConfig::from_str(
            r##"
[page]
width = 612
height = 792.0

[text]
font_size = 30
line_height = 1.5

[preview]
canvas_width = 612
class_prefix = ""

[colors]
text = "#333333"
"##,
        )
        .unwrap();

        assert_eq!(config.layout.page, PageSize::new(612.0, 792.0));
        assert_eq!(config.layout.default_font_size, 30);
        assert_eq!(config.layout.line_height_factor, 1.5);
        assert_eq!(config.layout.selection_padding, 10.0);
        assert_eq!(config.preview.canvas_width, 612.0);
        assert_eq!(config.preview.class_prefix, None);
        assert_eq!(config.stylesheet.resolve(TEXT), Some("#333333"));
        assert_eq!(config.stylesheet.resolve(SELECTION), Some("#32b8c6"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            NamecardConfig::from_str("[text]\nfont_size = 0\n"),
            Err(ConfigError::Invalid { field: "text.font_size", .. })
        ));
        assert!(matches!(
            NamecardConfig::from_str("[page]\nwidth = -1\n"),
            Err(ConfigError::Invalid { field: "page.width", .. })
        ));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            NamecardConfig::from_str("[page\nwidth = 1"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            NamecardConfig::from_str("[page]\ndepth = 3\n"),
            Err(ConfigError::Parse(_))
        ));
    }
}
