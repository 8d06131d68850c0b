//! Pointer-driven selection, dragging and page navigation
//!
//! `press`, `move_to` and `double_press` take document-space positions. The
//! `*_on_surface` variants take surface positions and map them through the
//! renderer's [`ScreenTransform`](super::ScreenTransform).

use tracing::debug;

use crate::layout::{LayoutError, LayoutModel, Point, TextMeasure};

use super::preview::{is_out_of_home, PreviewRenderer};

/// An entry being dragged and where the pointer grabbed it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub index: usize,
    /// Pointer position relative to the anchor when the drag started
    pub offset: Point,
}

/// Interaction state for one preview surface
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerSession {
    page: usize,
    drag: Option<DragState>,
    out_of_bounds: bool,
}

impl PointerSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page currently shown
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn drag(&self) -> Option<DragState> {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether the last dragged entry sits outside its default quadrant
    pub fn out_of_bounds(&self) -> bool {
        self.out_of_bounds
    }

    /// Press at `point`: select and start dragging the entry under it, or
    /// clear the selection when nothing is hit
    pub fn press<M: TextMeasure>(
        &mut self,
        model: &mut LayoutModel,
        renderer: &PreviewRenderer<M>,
        point: Point,
    ) -> Result<Option<usize>, LayoutError> {
        let Some(index) = renderer.hit_test(model, self.page, point) else {
            model.clear_selection();
            self.drag = None;
            self.out_of_bounds = false;
            return Ok(None);
        };

        model.select(Some(index))?;
        let anchor = model
            .entry(index)
            .map(|entry| entry.anchor)
            .ok_or(LayoutError::unknown_entry(index, model.len()))?;
        self.drag = Some(DragState {
            index,
            offset: point.offset_from(anchor),
        });
        self.out_of_bounds = is_out_of_home(model, index);
        debug!(index, "drag started");
        Ok(Some(index))
    }

    /// [`press`](Self::press) with a surface position
    pub fn press_on_surface<M: TextMeasure>(
        &mut self,
        model: &mut LayoutModel,
        renderer: &PreviewRenderer<M>,
        screen: Point,
    ) -> Result<Option<usize>, LayoutError> {
        let point = renderer.to_document(model, screen);
        self.press(model, renderer, point)
    }

    /// [`move_to`](Self::move_to) with a surface position
    pub fn move_on_surface<M: TextMeasure>(
        &mut self,
        model: &mut LayoutModel,
        renderer: &PreviewRenderer<M>,
        screen: Point,
    ) -> Result<Option<Point>, LayoutError> {
        let point = renderer.to_document(model, screen);
        self.move_to(model, point)
    }

    /// Pointer moved to `point`. Returns the clamped anchor while dragging.
    pub fn move_to(
        &mut self,
        model: &mut LayoutModel,
        point: Point,
    ) -> Result<Option<Point>, LayoutError> {
        let Some(drag) = self.drag else {
            return Ok(None);
        };
        let anchor = model.update_anchor(drag.index, point.minus(drag.offset))?;
        self.out_of_bounds = is_out_of_home(model, drag.index);
        Ok(Some(anchor))
    }

    /// End a drag; the selection and the out-of-bounds hint stay
    pub fn release(&mut self) -> Option<usize> {
        let index = self.drag.take().map(|drag| drag.index);
        if let Some(index) = index {
            debug!(index, out_of_bounds = self.out_of_bounds, "drag finished");
        }
        index
    }

    /// Double press: select the entry under `point` and return it as the text edit target
    pub fn double_press<M: TextMeasure>(
        &mut self,
        model: &mut LayoutModel,
        renderer: &PreviewRenderer<M>,
        point: Point,
    ) -> Result<Option<usize>, LayoutError> {
        self.drag = None;
        match renderer.hit_test(model, self.page, point) {
            Some(index) => {
                model.select(Some(index))?;
                Ok(Some(index))
            }
            None => Ok(None),
        }
    }

    /// [`double_press`](Self::double_press) with a surface position
    pub fn double_press_on_surface<M: TextMeasure>(
        &mut self,
        model: &mut LayoutModel,
        renderer: &PreviewRenderer<M>,
        screen: Point,
    ) -> Result<Option<usize>, LayoutError> {
        let point = renderer.to_document(model, screen);
        self.double_press(model, renderer, point)
    }

    pub fn next_page(&mut self, model: &mut LayoutModel) -> usize {
        self.set_page(model, self.page.saturating_add(1))
    }

    pub fn previous_page(&mut self, model: &mut LayoutModel) -> usize {
        self.set_page(model, self.page.saturating_sub(1))
    }

    /// Show `page`, clamped to the model's page range. Clears the selection.
    pub fn set_page(&mut self, model: &mut LayoutModel, page: usize) -> usize {
        let last = model.page_count().saturating_sub(1);
        self.page = page.min(last);
        self.drag = None;
        self.out_of_bounds = false;
        model.clear_selection();
        self.page
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::font::FontResource;
    use crate::layout::{LayoutConfig, Quadrant};
    use crate::names::{NameRecord, NameRecordStore};
    use crate::renderer::PreviewConfig;
    use crate::stylesheet::Stylesheet;

    fn setup(count: usize) -> (LayoutModel, PreviewRenderer<FontResource>) {
        let records: NameRecordStore = (0..count)
            .map(|i| NameRecord::new(format!("Guest{i}"), "Doe"))
            .collect();
        let mut model = LayoutModel::new(LayoutConfig::default());
        model.load_records(&records);
        let renderer = PreviewRenderer::new(
            FontResource::helvetica(),
            PreviewConfig::default(),
            Stylesheet::default(),
        );
        (model, renderer)
    }

    #[test]
    fn test_press_selects_and_keeps_grab_offset() {
        let (mut model, renderer) = setup(4);
        let mut session = PointerSession::new();

        let grab = Point::new(150.75, 630.5);
        assert_eq!(session.press(&mut model, &renderer, grab), Ok(Some(0)));
        assert_eq!(model.selected(), Some(0));
        assert_eq!(session.drag().map(|d| d.offset), Some(Point::new(2.0, -1.0)));

        let anchor = session.move_to(&mut model, Point::new(102.0, 599.0)).unwrap();
        assert_eq!(anchor, Some(Point::new(100.0, 600.0)));
        assert!(!session.out_of_bounds());

        assert_eq!(session.release(), Some(0));
        assert!(!session.is_dragging());
        assert_eq!(model.selected(), Some(0));
    }

    #[test]
    fn test_press_on_empty_space_clears_selection() {
        let (mut model, renderer) = setup(4);
        let mut session = PointerSession::new();
        model.select(Some(2)).unwrap();
        assert_eq!(
            session.press(&mut model, &renderer, Point::new(297.5, 421.0)),
            Ok(None)
        );
        assert_eq!(model.selected(), None);
        assert!(!session.is_dragging());
    }

    #[test]
    fn test_drag_across_quadrants_sets_hint() {
        let (mut model, renderer) = setup(2);
        let mut session = PointerSession::new();
        let anchor = model.entry(1).unwrap().anchor;
        session.press(&mut model, &renderer, anchor).unwrap();

        session.move_to(&mut model, Point::new(10.0, 10.0)).unwrap();
        assert!(session.out_of_bounds());
        assert_eq!(model.default_quadrant(1), Quadrant::TopRight);

        session.release();
        assert!(session.out_of_bounds());
        assert_eq!(model.entry(1).unwrap().anchor, Point::new(10.0, 10.0));
    }

    #[test]
    fn test_drag_is_clamped_to_page() {
        let (mut model, renderer) = setup(1);
        let mut session = PointerSession::new();
        let anchor = model.entry(0).unwrap().anchor;
        session.press(&mut model, &renderer, anchor).unwrap();
        let stored = session.move_to(&mut model, Point::new(-40.0, 900.0)).unwrap();
        assert_eq!(stored, Some(Point::new(0.0, 842.0)));
    }

    #[test]
    fn test_surface_positions_are_flipped_and_scaled() {
        let (mut model, _) = setup(2);
        let renderer = PreviewRenderer::new(
            FontResource::helvetica(),
            PreviewConfig::default().with_canvas_width(1190.0),
            Stylesheet::default(),
        );
        let mut session = PointerSession::new();

        // entry 1 sits at (446.25, 631.5); at scale 2 that is (892.5, 421) on the surface
        assert_eq!(
            renderer.to_document(&model, Point::new(892.5, 421.0)),
            Point::new(446.25, 631.5)
        );
        assert_eq!(
            session.press_on_surface(&mut model, &renderer, Point::new(892.5, 421.0)),
            Ok(Some(1))
        );
        assert_eq!(session.drag().map(|d| d.offset), Some(Point::new(0.0, 0.0)));

        let anchor = session
            .move_on_surface(&mut model, &renderer, Point::new(20.0, 1664.0))
            .unwrap();
        assert_eq!(anchor, Some(Point::new(10.0, 10.0)));
        assert!(session.out_of_bounds());
        session.release();

        // the bottom of the surface is document y = 0, where nothing is placed
        assert_eq!(
            session.double_press_on_surface(&mut model, &renderer, Point::new(892.5, 1684.0)),
            Ok(None)
        );
        assert_eq!(
            session.double_press_on_surface(&mut model, &renderer, Point::new(297.5, 421.0)),
            Ok(Some(0))
        );
    }

    #[test]
    fn test_move_without_drag_is_ignored() {
        let (mut model, _) = setup(1);
        let mut session = PointerSession::new();
        let before = model.entry(0).unwrap().anchor;
        assert_eq!(session.move_to(&mut model, Point::new(1.0, 1.0)), Ok(None));
        assert_eq!(model.entry(0).unwrap().anchor, before);
    }

    #[test]
    fn test_double_press_reports_focus_target() {
        let (mut model, renderer) = setup(3);
        let mut session = PointerSession::new();
        let anchor = model.entry(2).unwrap().anchor;
        assert_eq!(session.double_press(&mut model, &renderer, anchor), Ok(Some(2)));
        assert_eq!(model.selected(), Some(2));
        assert!(!session.is_dragging());
    }

    #[test]
    fn test_page_navigation_clamps_and_clears_selection() {
        let (mut model, _) = setup(9);
        let mut session = PointerSession::new();

        assert_eq!(session.previous_page(&mut model), 0);
        model.select(Some(1)).unwrap();
        assert_eq!(session.next_page(&mut model), 1);
        assert_eq!(model.selected(), None);
        assert_eq!(session.next_page(&mut model), 2);
        assert_eq!(session.next_page(&mut model), 2);
        assert_eq!(session.set_page(&mut model, 40), 2);
        assert_eq!(session.previous_page(&mut model), 1);
    }

    #[test]
    fn test_press_uses_current_page() {
        let (mut model, renderer) = setup(5);
        let mut session = PointerSession::new();
        let anchor = model.entry(4).unwrap().anchor;
        // entry 4 shares entry 0's quadrant but lives on the second page
        assert_eq!(session.press(&mut model, &renderer, anchor), Ok(Some(0)));
        session.next_page(&mut model);
        assert_eq!(session.press(&mut model, &renderer, anchor), Ok(Some(4)));
    }
}
