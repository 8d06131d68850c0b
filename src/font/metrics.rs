//! Single-byte font metrics and text encoding
//!
//! Output text is encoded one byte per character in the Latin-1 range that
//! WinAnsiEncoding shares with Unicode. Anything else becomes `?`, both when
//! measuring and when drawing, so measured and printed text always agree.

use crate::layout::TextMeasure;

/// First code covered by a width table (space)
pub const FIRST_CHAR: u8 = 32;

/// Last code covered by a width table
pub const LAST_CHAR: u8 = 255;

const REPLACEMENT: u8 = b'?';

/// Byte code used to draw `ch`
pub fn encode_char(ch: char) -> u8 {
    match u32::from(ch) {
        code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
        _ => REPLACEMENT,
    }
}

/// Byte string used to draw `text`
pub fn encode_text(text: &str) -> Vec<u8> {
    text.chars().map(encode_char).collect()
}

/// Advance widths in thousandths of an em for codes `first_char..=255`
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    first_char: u8,
    widths: Vec<u16>,
}

impl FontMetrics {
    pub fn new(first_char: u8, widths: Vec<u16>) -> Self {
        Self { first_char, widths }
    }

    pub fn first_char(&self) -> u8 {
        self.first_char
    }

    pub fn last_char(&self) -> u8 {
        let span = self.widths.len().saturating_sub(1);
        (usize::from(self.first_char) + span).min(usize::from(LAST_CHAR)) as u8
    }

    pub fn widths(&self) -> &[u16] {
        &self.widths
    }

    /// Width of one code; codes outside the table are zero-width
    pub fn width_of(&self, code: u8) -> u16 {
        code.checked_sub(self.first_char)
            .and_then(|i| self.widths.get(usize::from(i)))
            .copied()
            .unwrap_or(0)
    }
}

impl TextMeasure for FontMetrics {
    fn measure(&self, text: &str, font_size: f64) -> f64 {
        let units: u32 = text
            .chars()
            .map(|ch| u32::from(self.width_of(encode_char(ch))))
            .sum();
        f64::from(units) * font_size / 1000.0
    }
}
