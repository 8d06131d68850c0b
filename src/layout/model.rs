//! Layout model: per-name placement state and the single selection
//!
//! Entries are created in bulk from the name records and never removed
//! individually. Every anchor mutation is clamped to the page.

use std::ops::Range;

use tracing::debug;

use crate::names::NameRecordStore;

use super::config::LayoutConfig;
use super::error::LayoutError;
use super::quadrant::{clamp_to_page, quadrant_center, Quadrant, NAMES_PER_PAGE};
use super::text::TextBlock;
use super::types::{PageSize, Point};

/// Placement and formatting state for one name
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementEntry {
    pub anchor: Point,
    pub font_size: u32,
    pub letter_spacing: u32,
    pub text_lines: Vec<String>,
}

impl PlacementEntry {
    /// View of this entry as input to the text layout engine
    pub fn text_block(&self) -> TextBlock<'_> {
        TextBlock {
            anchor: self.anchor,
            lines: &self.text_lines,
            font_size: self.font_size,
            letter_spacing: self.letter_spacing,
        }
    }
}

/// Number of pages needed for `count` names
pub fn page_count_for(count: usize) -> usize {
    count.div_ceil(NAMES_PER_PAGE)
}

/// Page holding the entry at `index`
pub fn page_of(index: usize) -> usize {
    index / NAMES_PER_PAGE
}

/// Owns every placement entry and the selected index
#[derive(Debug, Clone, Default)]
pub struct LayoutModel {
    config: LayoutConfig,
    entries: Vec<PlacementEntry>,
    selected: Option<usize>,
}

impl LayoutModel {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
            selected: None,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn page_size(&self) -> PageSize {
        self.config.page
    }

    /// Replace all entries with defaults for `records` and clear the selection
    pub fn load_records(&mut self, records: &NameRecordStore) {
        let page = self.config.page;
        let font_size = self.config.default_font_size;
        self.entries = records
            .iter()
            .enumerate()
            .map(|(index, record)| PlacementEntry {
                anchor: quadrant_center(Quadrant::for_entry(index), page),
                font_size,
                letter_spacing: 0,
                text_lines: record.lines(),
            })
            .collect();
        self.selected = None;
        debug!(
            entries = self.entries.len(),
            pages = self.page_count(),
            "loaded placement entries"
        );
    }

    pub fn entries(&self) -> &[PlacementEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&PlacementEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Set or clear the selected entry
    pub fn select(&mut self, index: Option<usize>) -> Result<(), LayoutError> {
        if let Some(i) = index {
            self.check(i)?;
        }
        self.selected = index;
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Gating signal for per-entry controls
    pub fn has_selection(&self) -> bool {
        self.selected.is_some()
    }

    /// Move an anchor, clamped to the page. Returns the stored anchor.
    ///
    /// Leaving the entry's home quadrant is allowed; only the page edge limits it.
    /// NaN or infinite coordinates are rejected and leave the anchor unchanged.
    pub fn update_anchor(&mut self, index: usize, point: Point) -> Result<Point, LayoutError> {
        let page = self.config.page;
        let entry = self.entry_mut(index)?;
        if !point.x.is_finite() || !point.y.is_finite() {
            return Err(LayoutError::NonFiniteAnchor {
                index,
                x: point.x,
                y: point.y,
            });
        }
        entry.anchor = clamp_to_page(point, page.width, page.height);
        Ok(entry.anchor)
    }

    /// Move an anchor back to the center of its default quadrant
    pub fn reset_to_default(&mut self, index: usize) -> Result<Point, LayoutError> {
        let center = quadrant_center(Quadrant::for_entry(index), self.config.page);
        let entry = self.entry_mut(index)?;
        entry.anchor = center;
        Ok(center)
    }

    /// Set the font size. Zero is ignored and reported as `Ok(false)`.
    pub fn set_font_size(&mut self, index: usize, px: u32) -> Result<bool, LayoutError> {
        let entry = self.entry_mut(index)?;
        if px == 0 {
            debug!(index, "ignoring zero font size");
            return Ok(false);
        }
        entry.font_size = px;
        Ok(true)
    }

    pub fn set_letter_spacing(&mut self, index: usize, units: u32) -> Result<(), LayoutError> {
        self.entry_mut(index)?.letter_spacing = units;
        Ok(())
    }

    /// Replace both text lines
    pub fn set_text(
        &mut self,
        index: usize,
        line1: impl Into<String>,
        line2: impl Into<String>,
    ) -> Result<(), LayoutError> {
        self.entry_mut(index)?.text_lines = vec![line1.into(), line2.into()];
        Ok(())
    }

    /// Replace the text from a single-line edit: first word, then the rest
    pub fn set_text_from_input(&mut self, index: usize, input: &str) -> Result<(), LayoutError> {
        let (first, rest) = input.split_once(' ').unwrap_or((input, ""));
        self.set_text(index, first, rest)
    }

    /// Quadrant an entry is assigned to by its position in the record list
    pub fn default_quadrant(&self, index: usize) -> Quadrant {
        Quadrant::for_entry(index)
    }

    pub fn page_count(&self) -> usize {
        page_count_for(self.entries.len())
    }

    pub fn page_of(&self, index: usize) -> usize {
        page_of(index)
    }

    /// Index range of the entries printed on `page`; empty past the last page
    pub fn entries_on_page(&self, page: usize) -> Range<usize> {
        let start = (page * NAMES_PER_PAGE).min(self.entries.len());
        let end = (start + NAMES_PER_PAGE).min(self.entries.len());
        start..end
    }

    fn check(&self, index: usize) -> Result<(), LayoutError> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(LayoutError::unknown_entry(index, self.entries.len()))
        }
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut PlacementEntry, LayoutError> {
        let count = self.entries.len();
        self.entries
            .get_mut(index)
            .ok_or(LayoutError::unknown_entry(index, count))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::names::NameRecord;

    fn model_with(count: usize) -> LayoutModel {
        let records: NameRecordStore = (0..count)
            .map(|i| NameRecord::new(format!("First{i}"), format!("Last{i}")))
            .collect();
        let mut model = LayoutModel::new(LayoutConfig::default());
        model.load_records(&records);
        model
    }

    #[test]
    fn test_page_count_formula() {
        for n in 0..=13 {
            assert_eq!(page_count_for(n), (n + 3) / 4, "n = {n}");
        }
        assert_eq!(model_with(0).page_count(), 0);
        assert_eq!(model_with(4).page_count(), 1);
        assert_eq!(model_with(5).page_count(), 2);
    }

    #[test]
    fn test_defaults_follow_index() {
        let model = model_with(6);
        let page = PageSize::A4;
        for (i, entry) in model.entries().iter().enumerate() {
            assert_eq!(entry.anchor, quadrant_center(Quadrant::for_entry(i), page));
            assert_eq!(entry.font_size, 24);
            assert_eq!(entry.letter_spacing, 0);
            assert_eq!(model.page_of(i), i / 4);
        }
        assert_eq!(
            model.entry(5).map(|e| e.text_lines.clone()),
            Some(vec!["First5".to_string(), "Last5".to_string()])
        );
    }

    #[test]
    fn test_reload_clears_selection() {
        let mut model = model_with(3);
        model.select(Some(2)).unwrap();
        assert!(model.has_selection());
        model.load_records(&NameRecordStore::from_records(vec![NameRecord::new("A", "B")]));
        assert_eq!(model.selected(), None);
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn test_select_unknown_index() {
        let mut model = model_with(2);
        assert_eq!(
            model.select(Some(2)),
            Err(LayoutError::UnknownEntry { index: 2, count: 2 })
        );
        assert_eq!(model.selected(), None);
        model.select(Some(1)).unwrap();
        model.select(None).unwrap();
        assert!(!model.has_selection());
    }

    #[test]
    fn test_update_anchor_clamps() {
        let mut model = model_with(1);
        let stored = model.update_anchor(0, Point::new(-500.0, 5000.0)).unwrap();
        assert_eq!(stored, Point::new(0.0, 842.0));
        let stored = model.update_anchor(0, Point::new(900.0, -1.0)).unwrap();
        assert_eq!(stored, Point::new(595.0, 0.0));
    }

    #[test]
    fn test_update_anchor_rejects_non_finite_points() {
        let mut model = model_with(1);
        let before = model.entry(0).map(|e| e.anchor);
        assert!(matches!(
            model.update_anchor(0, Point::new(f64::NAN, 100.0)),
            Err(LayoutError::NonFiniteAnchor { index: 0, .. })
        ));
        assert!(model.update_anchor(0, Point::new(10.0, f64::INFINITY)).is_err());
        assert_eq!(model.entry(0).map(|e| e.anchor), before);
    }

    #[test]
    fn test_update_anchor_allows_leaving_home_quadrant() {
        let mut model = model_with(6);
        let stored = model.update_anchor(5, Point::new(10.0, 10.0)).unwrap();
        assert_eq!(stored, Point::new(10.0, 10.0));
        assert_eq!(model.default_quadrant(5), Quadrant::TopRight);
    }

    #[test]
    fn test_reset_to_default() {
        let mut model = model_with(3);
        model.update_anchor(2, Point::new(1.0, 1.0)).unwrap();
        let center = model.reset_to_default(2).unwrap();
        assert_eq!(center, Point::new(148.75, 210.5));
        assert_eq!(model.entry(2).map(|e| e.anchor), Some(center));
    }

    #[test]
    fn test_zero_font_size_is_ignored() {
        let mut model = model_with(1);
        assert_eq!(model.set_font_size(0, 0), Ok(false));
        assert_eq!(model.entry(0).map(|e| e.font_size), Some(24));
        assert_eq!(model.set_font_size(0, 36), Ok(true));
        assert_eq!(model.entry(0).map(|e| e.font_size), Some(36));
    }

    #[test]
    fn test_text_edits() {
        let mut model = model_with(1);
        model.set_letter_spacing(0, 4).unwrap();
        model.set_text_from_input(0, "Anna Maria Müller").unwrap();
        let entry = model.entry(0).unwrap();
        assert_eq!(entry.letter_spacing, 4);
        assert_eq!(entry.text_lines, vec!["Anna", "Maria Müller"]);

        model.set_text_from_input(0, "Cher").unwrap();
        assert_eq!(model.entry(0).unwrap().text_lines, vec!["Cher", ""]);
    }

    #[test]
    fn test_mutators_reject_unknown_index() {
        let mut model = model_with(1);
        assert!(model.update_anchor(1, Point::new(0.0, 0.0)).is_err());
        assert!(model.reset_to_default(1).is_err());
        assert!(model.set_font_size(1, 12).is_err());
        assert!(model.set_letter_spacing(1, 1).is_err());
        assert!(model.set_text(1, "a", "b").is_err());
    }

    #[test]
    fn test_entries_on_page() {
        let model = model_with(9);
        assert_eq!(model.entries_on_page(0), 0..4);
        assert_eq!(model.entries_on_page(1), 4..8);
        assert_eq!(model.entries_on_page(2), 8..9);
        assert!(model.entries_on_page(3).is_empty());
    }
}
