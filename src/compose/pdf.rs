//! PDF output backed by lopdf
//!
//! The template's first page is wrapped once in a form XObject. Every output
//! page draws that form and then its own text, so template content is shared
//! rather than duplicated per page.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

use crate::error::DecodeError;
use crate::font::{FontProgram, FontResource};
use crate::layout::PageSize;

use super::document::{DrawCommand, FontHandle, OutputDocument, PageHandle};
use super::error::ComposeError;

const TEMPLATE_XOBJECT: &str = "NcTpl";
const MAX_TREE_DEPTH: usize = 32;

/// Catalog entries that may still point at the template's original pages
const STALE_CATALOG_KEYS: [&str; 3] = ["OpenAction", "Outlines", "StructTreeRoot"];

#[derive(Debug)]
struct TemplatePage {
    form_id: ObjectId,
    media_box: Vec<Object>,
    crop_box: Option<Vec<Object>>,
    rotate: Option<i64>,
    size: PageSize,
}

/// Output document built on a decoded template PDF
#[derive(Debug)]
pub struct PdfDocument {
    doc: Document,
    pages_root: ObjectId,
    template: TemplatePage,
    fonts: Vec<(String, ObjectId)>,
    pages: Vec<Vec<Operation>>,
}

impl PdfDocument {
    /// Number of pages appended so far
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn template_error(message: impl ToString) -> ComposeError {
        ComposeError::Decode(DecodeError::Template(message.to_string()))
    }
}

impl OutputDocument for PdfDocument {
    fn from_template(bytes: &[u8]) -> Result<Self, ComposeError> {
        if bytes.is_empty() {
            return Err(ComposeError::Decode(DecodeError::EmptyTemplate));
        }
        let mut doc = Document::load_mem(bytes).map_err(Self::template_error)?;
        if doc.is_encrypted() {
            return Err(Self::template_error("template is encrypted"));
        }

        let page_id = *doc
            .get_pages()
            .values()
            .next()
            .ok_or(ComposeError::Decode(DecodeError::EmptyTemplate))?;
        let pages_root = doc
            .catalog()
            .and_then(|catalog| catalog.get(b"Pages"))
            .and_then(Object::as_reference)
            .map_err(Self::template_error)?;

        let media_box = inherited(&doc, page_id, b"MediaBox")
            .and_then(|obj| obj.as_array().ok())
            .filter(|arr| arr.len() == 4)
            .cloned()
            .unwrap_or_else(|| {
                let a4 = PageSize::A4;
                vec![0.into(), 0.into(), a4.width.into(), a4.height.into()]
            });
        let crop_box = inherited(&doc, page_id, b"CropBox")
            .and_then(|obj| obj.as_array().ok())
            .filter(|arr| arr.len() == 4)
            .cloned();
        let rotate = inherited(&doc, page_id, b"Rotate").and_then(|obj| obj.as_i64().ok());
        let resources = inherited(&doc, page_id, b"Resources")
            .cloned()
            .unwrap_or_else(|| Object::Dictionary(Dictionary::new()));
        let size = box_size(&media_box).unwrap_or(PageSize::A4);

        let content = doc.get_page_content(page_id).map_err(Self::template_error)?;
        let form = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "FormType" => 1_i64,
                "BBox" => Object::Array(media_box.clone()),
                "Resources" => resources,
            },
            content,
        );
        let form_id = doc.add_object(form);
        debug!(width = size.width, height = size.height, "loaded template page");

        Ok(Self {
            doc,
            pages_root,
            template: TemplatePage {
                form_id,
                media_box,
                crop_box,
                rotate,
                size,
            },
            fonts: Vec::new(),
            pages: Vec::new(),
        })
    }

    fn page_size(&self) -> PageSize {
        self.template.size
    }

    fn append_template_page(&mut self) -> Result<PageHandle, ComposeError> {
        self.pages.push(vec![
            Operation::new("q", vec![]),
            Operation::new("Do", vec![Object::Name(TEMPLATE_XOBJECT.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ]);
        Ok(PageHandle(self.pages.len() - 1))
    }

    fn embed_font(&mut self, font: &FontResource) -> Result<FontHandle, ComposeError> {
        let base_font = font.base_font_name().to_string();
        let metrics = font.metrics();
        if metrics.widths().is_empty() {
            return Err(ComposeError::font_embed(base_font, "font has no glyph widths"));
        }

        let font_dict = match font.embedded() {
            None => dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
                "Encoding" => "WinAnsiEncoding",
            },
            Some(program) => {
                if program.data.is_empty() {
                    return Err(ComposeError::font_embed(base_font, "font program is empty"));
                }
                let (subtype, file_key) = match program.program {
                    FontProgram::TrueType => ("TrueType", "FontFile2"),
                    FontProgram::OpenTypeCff => ("Type1", "FontFile3"),
                };
                let mut file_dict = dictionary! {
                    "Length1" => program.data.len() as i64,
                };
                if program.program == FontProgram::OpenTypeCff {
                    file_dict.set("Subtype", "OpenType");
                }
                let file_id = self.doc.add_object(Stream::new(file_dict, program.data.clone()));

                let d = &program.descriptor;
                let descriptor_id = self.doc.add_object(dictionary! {
                    "Type" => "FontDescriptor",
                    "FontName" => Object::Name(base_font.as_bytes().to_vec()),
                    "Flags" => d.flags,
                    "FontBBox" => d.bbox.iter().map(|v| Object::Integer(*v)).collect::<Vec<_>>(),
                    "ItalicAngle" => d.italic_angle,
                    "Ascent" => d.ascent,
                    "Descent" => d.descent,
                    "CapHeight" => d.cap_height,
                    "StemV" => d.stem_v,
                    file_key => file_id,
                });

                dictionary! {
                    "Type" => "Font",
                    "Subtype" => subtype,
                    "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
                    "FirstChar" => i64::from(metrics.first_char()),
                    "LastChar" => i64::from(metrics.last_char()),
                    "Widths" => metrics
                        .widths()
                        .iter()
                        .map(|w| Object::Integer(i64::from(*w)))
                        .collect::<Vec<_>>(),
                    "FontDescriptor" => descriptor_id,
                    "Encoding" => "WinAnsiEncoding",
                }
            }
        };

        let font_id = self.doc.add_object(font_dict);
        let name = format!("NcF{}", self.fonts.len() + 1);
        self.fonts.push((name.clone(), font_id));
        debug!(font = %base_font, resource = %name, "embedded font");
        Ok(FontHandle(name))
    }

    fn draw_text(
        &mut self,
        page: PageHandle,
        command: &DrawCommand<'_>,
    ) -> Result<(), ComposeError> {
        if !self.fonts.iter().any(|(name, _)| name == command.font.name()) {
            return Err(ComposeError::Draw(format!(
                "font '{}' was never embedded",
                command.font.name()
            )));
        }
        let page_count = self.pages.len();
        let ops = self.pages.get_mut(page.0).ok_or_else(|| {
            ComposeError::Draw(format!("no page {} ({} pages)", page.0, page_count))
        })?;

        let [r, g, b] = command.color;
        ops.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(command.font.name().as_bytes().to_vec()),
                    command.size.into(),
                ],
            ),
            Operation::new(
                "rg",
                vec![f64::from(r).into(), f64::from(g).into(), f64::from(b).into()],
            ),
            Operation::new(
                "Tm",
                vec![
                    1.into(),
                    0.into(),
                    0.into(),
                    1.into(),
                    command.x.into(),
                    command.y.into(),
                ],
            ),
            Operation::new(
                "Tj",
                vec![Object::String(command.text.to_vec(), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>, ComposeError> {
        if self.pages.is_empty() {
            return Err(ComposeError::NothingToCompose);
        }

        let mut font_resources = Dictionary::new();
        for (name, id) in &self.fonts {
            font_resources.set(name.as_bytes().to_vec(), Object::Reference(*id));
        }
        let resources_id = self.doc.add_object(dictionary! {
            "XObject" => dictionary! {
                TEMPLATE_XOBJECT => self.template.form_id,
            },
            "Font" => font_resources,
        });

        let mut kids = Vec::with_capacity(self.pages.len());
        for operations in std::mem::take(&mut self.pages) {
            let content = Content { operations }
                .encode()
                .map_err(|e| ComposeError::Serialize(e.to_string()))?;
            let content_id = self.doc.add_object(Stream::new(dictionary! {}, content));

            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => self.pages_root,
                "MediaBox" => Object::Array(self.template.media_box.clone()),
                "Resources" => resources_id,
                "Contents" => content_id,
            };
            if let Some(crop_box) = &self.template.crop_box {
                page.set("CropBox", Object::Array(crop_box.clone()));
            }
            if let Some(rotate) = self.template.rotate {
                page.set("Rotate", rotate);
            }
            kids.push(Object::Reference(self.doc.add_object(page)));
        }
        let count = kids.len() as i64;

        let pages = self
            .doc
            .get_object_mut(self.pages_root)
            .and_then(Object::as_dict_mut)
            .map_err(|e| ComposeError::PageCopy(e.to_string()))?;
        pages.set("Kids", kids);
        pages.set("Count", count);

        let catalog_id = self
            .doc
            .trailer
            .get(b"Root")
            .and_then(Object::as_reference)
            .map_err(|e| ComposeError::Serialize(e.to_string()))?;
        if let Ok(catalog) = self.doc.get_object_mut(catalog_id).and_then(Object::as_dict_mut) {
            for key in STALE_CATALOG_KEYS {
                catalog.remove(key.as_bytes());
            }
        }

        let info_id = self.doc.add_object(dictionary! {
            "Producer" => Object::string_literal(concat!("namecards ", env!("CARGO_PKG_VERSION"))),
        });
        self.doc.trailer.set("Info", info_id);

        self.doc.prune_objects();
        self.doc.compress();

        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|e| ComposeError::Serialize(e.to_string()))?;
        debug!(pages = count, bytes = buffer.len(), "serialized output document");
        Ok(buffer)
    }
}

/// Look up a page attribute, walking up the page tree for inherited values
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = Some(page_id);
    for _ in 0..MAX_TREE_DEPTH {
        let id = current?;
        let dict = doc.get_object(id).and_then(Object::as_dict).ok()?;
        if let Ok(value) = dict.get(key) {
            return match value {
                Object::Reference(target) => doc.get_object(*target).ok(),
                other => Some(other),
            };
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some(f64::from(*f)),
        _ => None,
    }
}

fn box_size(rect: &[Object]) -> Option<PageSize> {
    let [llx, lly, urx, ury] = rect else {
        return None;
    };
    let width = (number(urx)? - number(llx)?).abs();
    let height = (number(ury)? - number(lly)?).abs();
    Some(PageSize::new(width, height))
}
