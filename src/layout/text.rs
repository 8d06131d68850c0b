//! Text layout engine
//!
//! Computes where each line (or, with letter spacing, each character) of a
//! namecard is drawn. The result is expressed in document space with Y growing
//! upward; callers targeting a screen surface flip Y once at their boundary.
//! The same code serves the interactive preview and the final PDF, so both
//! center and stack text identically.

use super::config::LayoutConfig;
use super::types::{BoundingBox, Point};

/// Capability to measure the advance width of a string at a font size
///
/// The preview and the compose stage supply different implementations.
pub trait TextMeasure {
    /// Width of `text` at `font_size`, in the same units as `font_size`
    fn measure(&self, text: &str, font_size: f64) -> f64;
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn measure(&self, text: &str, font_size: f64) -> f64 {
        (**self).measure(text, font_size)
    }
}

/// Input to the engine: a text block centered on an anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBlock<'a> {
    pub anchor: Point,
    pub lines: &'a [String],
    pub font_size: u32,
    pub letter_spacing: u32,
}

/// One draw instruction: a whole line or a single character
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Index of the line this run belongs to
    pub line: usize,
    pub text: String,
    /// Left edge of the run
    pub x: f64,
    /// Baseline of the run
    pub y: f64,
}

/// Line stacking, centering and letter spacing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextLayoutEngine {
    line_height_factor: f64,
    selection_padding: f64,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}

impl TextLayoutEngine {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            line_height_factor: config.line_height_factor,
            selection_padding: config.selection_padding,
        }
    }

    pub fn line_height(&self, font_size: u32) -> f64 {
        f64::from(font_size) * self.line_height_factor
    }

    /// Height of all lines of the block stacked
    pub fn block_height(&self, block: &TextBlock<'_>) -> f64 {
        block.lines.len() as f64 * self.line_height(block.font_size)
    }

    /// Compute the draw instructions for a block
    ///
    /// Empty lines keep their slot in the stack but produce no run.
    pub fn layout(&self, block: &TextBlock<'_>, measure: &impl TextMeasure) -> Vec<TextRun> {
        let size = f64::from(block.font_size);
        let spacing = f64::from(block.letter_spacing);
        let line_height = self.line_height(block.font_size);
        let first_y = block.anchor.y + self.block_height(block) / 2.0 - line_height / 2.0;

        let mut runs = Vec::new();
        for (line_index, line) in block.lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let y = first_y - line_index as f64 * line_height;

            if block.letter_spacing == 0 {
                let width = measure.measure(line, size);
                runs.push(TextRun {
                    line: line_index,
                    text: line.clone(),
                    x: block.anchor.x - width / 2.0,
                    y,
                });
                continue;
            }

            let total = spaced_width(line, size, spacing, measure);
            let mut x = block.anchor.x - total / 2.0;
            let mut buf = [0u8; 4];
            for ch in line.chars() {
                let glyph: &str = ch.encode_utf8(&mut buf);
                runs.push(TextRun {
                    line: line_index,
                    text: glyph.to_string(),
                    x,
                    y,
                });
                x += measure.measure(glyph, size) + spacing;
            }
        }
        runs
    }

    /// Width of the widest line including letter spacing
    pub fn block_width(&self, block: &TextBlock<'_>, measure: &impl TextMeasure) -> f64 {
        let size = f64::from(block.font_size);
        let spacing = f64::from(block.letter_spacing);
        block
            .lines
            .iter()
            .map(|line| {
                let gaps = line.chars().count().saturating_sub(1) as f64;
                measure.measure(line, size) + spacing * gaps
            })
            .fold(0.0, f64::max)
    }

    /// Padded highlight box centered on the anchor, used for selection and hit testing
    pub fn selection_bounds(&self, block: &TextBlock<'_>, measure: &impl TextMeasure) -> BoundingBox {
        let width = self.block_width(block, measure);
        let height = self.block_height(block);
        BoundingBox::centered_on(block.anchor, width, height).padded(self.selection_padding)
    }
}

/// Sum of per-character widths plus one spacing between each pair of characters
pub fn spaced_width(line: &str, font_size: f64, spacing: f64, measure: &impl TextMeasure) -> f64 {
    let mut buf = [0u8; 4];
    let mut count = 0usize;
    let mut width = 0.0;
    for ch in line.chars() {
        width += measure.measure(ch.encode_utf8(&mut buf), font_size);
        count += 1;
    }
    width + spacing * count.saturating_sub(1) as f64
}
