//! Decoding custom TrueType/OpenType fonts with ttf-parser

use tracing::debug;

use crate::error::DecodeError;

use super::metrics::{FontMetrics, FIRST_CHAR, LAST_CHAR};

/// Outline format of an embedded font program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontProgram {
    TrueType,
    OpenTypeCff,
}

/// Values for the PDF font descriptor, in thousandths of an em
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    pub flags: i64,
    pub bbox: [i64; 4],
    pub italic_angle: i64,
    pub ascent: i64,
    pub descent: i64,
    pub cap_height: i64,
    pub stem_v: i64,
}

/// A decoded font ready to be embedded
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFont {
    pub postscript_name: String,
    pub program: FontProgram,
    pub descriptor: FontDescriptor,
    pub metrics: FontMetrics,
    pub data: Vec<u8>,
}

/// Flag bit for fonts using the standard Latin character set
const NONSYMBOLIC: i64 = 32;

/// Flag bit for monospaced fonts
const FIXED_PITCH: i64 = 1;

/// Parse font bytes and extract widths for codes 32..=255
pub fn decode(data: &[u8]) -> Result<DecodedFont, DecodeError> {
    let face =
        ttf_parser::Face::parse(data, 0).map_err(|e| DecodeError::Font(e.to_string()))?;

    let units_per_em = face.units_per_em().max(1);
    let scale = 1000.0 / f32::from(units_per_em);
    let scaled = |value: i16| (f32::from(value) * scale).round() as i64;

    let widths = (FIRST_CHAR..=LAST_CHAR)
        .map(|code| {
            if (0x7F..=0x9F).contains(&code) {
                return 0;
            }
            face.glyph_index(char::from(code))
                .and_then(|glyph| face.glyph_hor_advance(glyph))
                .map(|advance| (f32::from(advance) * scale).round().clamp(0.0, 65535.0) as u16)
                .unwrap_or(0)
        })
        .collect();

    let program = if face.tables().cff.is_some() {
        FontProgram::OpenTypeCff
    } else {
        FontProgram::TrueType
    };

    let bbox = face.global_bounding_box();
    let ascent = scaled(face.ascender());
    let mut flags = NONSYMBOLIC;
    if face.is_monospaced() {
        flags |= FIXED_PITCH;
    }
    let descriptor = FontDescriptor {
        flags,
        bbox: [
            scaled(bbox.x_min),
            scaled(bbox.y_min),
            scaled(bbox.x_max),
            scaled(bbox.y_max),
        ],
        italic_angle: face.italic_angle().map(|a| a.round() as i64).unwrap_or(0),
        ascent,
        descent: scaled(face.descender()),
        cap_height: face.capital_height().map(scaled).unwrap_or(ascent),
        stem_v: 80,
    };

    let postscript_name = postscript_name(&face);
    debug!(font = %postscript_name, ?program, "decoded custom font");

    Ok(DecodedFont {
        postscript_name,
        program,
        descriptor,
        metrics: FontMetrics::new(FIRST_CHAR, widths),
        data: data.to_vec(),
    })
}

/// PostScript name restricted to characters valid in a PDF name
fn postscript_name(face: &ttf_parser::Face<'_>) -> String {
    use ttf_parser::name::name_id;

    let name = face
        .names()
        .into_iter()
        .filter(|n| n.name_id == name_id::POST_SCRIPT_NAME)
        .find_map(|n| n.to_string())
        .unwrap_or_default();
    sanitize_font_name(&name)
}

fn sanitize_font_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if cleaned.is_empty() {
        "CustomFont".to_string()
    } else {
        cleaned
    }
}
