//! Color palette for the preview and the printed text
//!
//! Colors are addressed by symbolic tokens (`text`, `selection`, ...) and
//! resolved to hex values. A `[colors]` table in TOML overrides any subset.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or parsing stylesheets
#[derive(Error, Debug)]
pub enum StylesheetError {
    #[error("Failed to read stylesheet file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse stylesheet TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Color of printed and previewed name text
pub const TEXT: &str = "text";
/// Outline of the selected entry
pub const SELECTION: &str = "selection";
/// Entries dragged out of their home quadrant
pub const WARNING: &str = "warning";
/// Quadrant grid lines
pub const QUADRANT: &str = "quadrant";
/// Preview page fill
pub const BACKGROUND: &str = "background";

const DEFAULT_PALETTE: [(&str, &str); 5] = [
    (TEXT, "#000000"),
    (SELECTION, "#32b8c6"),
    (WARNING, "#e67e22"),
    (QUADRANT, "#dee2e6"),
    (BACKGROUND, "#ffffff"),
];

const FALLBACK_COLOR: &str = "#000000";

/// A stylesheet mapping symbolic colors to concrete values
#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    pub name: Option<String>,
    /// Color mappings: token name -> hex color
    pub colors: HashMap<String, String>,
}

/// TOML structure for deserializing stylesheets
#[derive(Deserialize)]
struct TomlStylesheet {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    colors: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
}

impl Stylesheet {
    /// Load stylesheet from TOML file
    pub fn from_file(path: &Path) -> Result<Self, StylesheetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load stylesheet from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, StylesheetError> {
        let parsed: TomlStylesheet = toml::from_str(content)?;
        Ok(Self::from_colors(parsed.metadata.and_then(|m| m.name), parsed.colors))
    }

    /// Default palette with `overrides` layered on top
    pub fn from_colors(name: Option<String>, overrides: HashMap<String, String>) -> Self {
        let mut stylesheet = Self::default();
        stylesheet.name = name;
        stylesheet.colors.extend(overrides);
        stylesheet
    }

    /// Resolve a symbolic color token to a concrete value
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.colors.get(token).map(|s| s.as_str())
    }

    /// Resolve a token, falling back to black for unknown tokens
    pub fn resolve_or_default(&self, token: &str) -> String {
        self.resolve(token).unwrap_or(FALLBACK_COLOR).to_string()
    }

    /// Resolve a token to RGB components in `0.0..=1.0`
    pub fn rgb(&self, token: &str) -> [f32; 3] {
        parse_hex_color(&self.resolve_or_default(token))
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self {
            name: None,
            colors: DEFAULT_PALETTE
                .iter()
                .map(|(token, color)| (token.to_string(), color.to_string()))
                .collect(),
        }
    }
}

/// Parse `#rrggbb` (or `#rgb`); anything unparsable is black
pub fn parse_hex_color(color: &str) -> [f32; 3] {
    let hex = color.trim().trim_start_matches('#');
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        _ => hex.to_string(),
    };
    let channel = |range: std::ops::Range<usize>| {
        expanded
            .get(range)
            .and_then(|digits| u8::from_str_radix(digits, 16).ok())
    };
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => [
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        ],
        _ => [0.0, 0.0, 0.0],
    }
}
