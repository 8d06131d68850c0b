//! Scripted edits applied to the layout model before preview or export
//!
//! An edit script is a TOML file of `[[edit]]` tables. Each edit goes through
//! the same model operations as pointer and control input, selecting its
//! entry first.
//!
//! ```toml
//! [[edit]]
//! index = 5
//! anchor = [120, 300]
//! font_size = 32
//!
//! [[edit]]
//! index = 0
//! text = "Anna Maria Müller"
//! letter_spacing = 2
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ConfigError;
use crate::layout::{LayoutError, LayoutModel, Point};

/// One scripted change to an entry
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Edit {
    pub index: usize,
    /// Move back to the default quadrant center before anything else
    #[serde(default)]
    pub center: bool,
    pub anchor: Option<[f64; 2]>,
    pub font_size: Option<u32>,
    pub letter_spacing: Option<u32>,
    /// Single-line text, split into first word and rest
    pub text: Option<String>,
    pub lines: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditScript {
    #[serde(default, rename = "edit")]
    pub edits: Vec<Edit>,
}

impl EditScript {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Apply every edit in order. Stops at the first edit naming an unknown entry.
    ///
    /// The selection is cleared afterwards.
    pub fn apply(&self, model: &mut LayoutModel) -> Result<(), ConfigError> {
        for (position, edit) in self.edits.iter().enumerate() {
            apply_edit(model, edit).map_err(|source| ConfigError::Edit {
                position: position + 1,
                source,
            })?;
        }
        model.clear_selection();
        debug!(edits = self.edits.len(), "applied edit script");
        Ok(())
    }
}

fn apply_edit(model: &mut LayoutModel, edit: &Edit) -> Result<(), LayoutError> {
    let index = edit.index;
    model.select(Some(index))?;

    if edit.center {
        model.reset_to_default(index)?;
    }
    if let Some([x, y]) = edit.anchor {
        let stored = model.update_anchor(index, Point::new(x, y))?;
        if stored != Point::new(x, y) {
            warn!(index, x, y, "anchor clamped to the page");
        }
    }
    if let Some(size) = edit.font_size {
        if !model.set_font_size(index, size)? {
            warn!(index, "ignoring zero font size");
        }
    }
    if let Some(spacing) = edit.letter_spacing {
        model.set_letter_spacing(index, spacing)?;
    }
    if let Some(text) = &edit.text {
        model.set_text_from_input(index, text)?;
    }
    if let Some(lines) = &edit.lines {
        let mut lines = lines.iter();
        let first = lines.next().cloned().unwrap_or_default();
        let rest: Vec<&str> = lines.map(String::as_str).collect();
        model.set_text(index, first, rest.join(" "))?;
    }
    Ok(())
}
