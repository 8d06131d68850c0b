//! Fonts used for measuring and drawing namecard text
//!
//! A [`FontResource`] is either the built-in Helvetica or a custom
//! TrueType/OpenType program decoded from user-supplied bytes. Both expose
//! the same single-byte width table, which the layout engine measures with.

pub mod metrics;
pub mod standard;
pub mod truetype;

use std::fmt;

pub use metrics::{encode_char, encode_text, FontMetrics, FIRST_CHAR, LAST_CHAR};
pub use standard::{helvetica_metrics, HELVETICA};
pub use truetype::{DecodedFont, FontDescriptor, FontProgram};

use crate::error::DecodeError;
use crate::layout::TextMeasure;

/// Which font ended up in a composed document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontKind {
    Standard,
    Custom,
}

impl fmt::Display for FontKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontKind::Standard => write!(f, "standard (Helvetica)"),
            FontKind::Custom => write!(f, "custom"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum FontSource {
    Standard,
    Embedded(Box<DecodedFont>),
}

/// A font that can be measured and embedded into an output document
#[derive(Debug, Clone, PartialEq)]
pub struct FontResource {
    metrics: FontMetrics,
    source: FontSource,
}

impl FontResource {
    pub fn helvetica() -> Self {
        Self {
            metrics: helvetica_metrics(),
            source: FontSource::Standard,
        }
    }

    /// Decode a custom font program
    pub fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
        let decoded = truetype::decode(data)?;
        Ok(Self {
            metrics: decoded.metrics.clone(),
            source: FontSource::Embedded(Box::new(decoded)),
        })
    }

    pub fn kind(&self) -> FontKind {
        match self.source {
            FontSource::Standard => FontKind::Standard,
            FontSource::Embedded(_) => FontKind::Custom,
        }
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    /// Name written as `/BaseFont` in the output
    pub fn base_font_name(&self) -> &str {
        match &self.source {
            FontSource::Standard => HELVETICA,
            FontSource::Embedded(font) => &font.postscript_name,
        }
    }

    /// Decoded program for custom fonts; `None` for Helvetica
    pub fn embedded(&self) -> Option<&DecodedFont> {
        match &self.source {
            FontSource::Standard => None,
            FontSource::Embedded(font) => Some(font),
        }
    }
}

impl Default for FontResource {
    fn default() -> Self {
        Self::helvetica()
    }
}

impl TextMeasure for FontResource {
    fn measure(&self, text: &str, font_size: f64) -> f64 {
        self.metrics.measure(text, font_size)
    }
}
