//! Quadrant geometry for the fixed 2x2 namecard grid
//!
//! The page is split at half width and half height. Quadrants are numbered
//! row by row starting at the top (largest Y): 0 = top-left, 1 = top-right,
//! 2 = bottom-left, 3 = bottom-right.
//!
//! Points on a bisector belong to the lower-indexed quadrant along that axis:
//! `x == width / 2` is left, `y == height / 2` is top.

use std::fmt;

use super::types::{BoundingBox, PageSize, Point};

/// Names printed per output page, one per quadrant
pub const NAMES_PER_PAGE: usize = 4;

/// One of the four fixed regions of the template page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    /// Default quadrant for the entry at `index`
    pub fn for_entry(index: usize) -> Self {
        Self::ALL[index % NAMES_PER_PAGE]
    }

    /// Quadrant with the given id, if it is in `0..4`
    pub fn from_id(id: usize) -> Option<Self> {
        Self::ALL.get(id).copied()
    }

    pub fn id(self) -> usize {
        match self {
            Quadrant::TopLeft => 0,
            Quadrant::TopRight => 1,
            Quadrant::BottomLeft => 2,
            Quadrant::BottomRight => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Quadrant::TopLeft => "top-left",
            Quadrant::TopRight => "top-right",
            Quadrant::BottomLeft => "bottom-left",
            Quadrant::BottomRight => "bottom-right",
        }
    }

    fn is_left(self) -> bool {
        matches!(self, Quadrant::TopLeft | Quadrant::BottomLeft)
    }

    fn is_top(self) -> bool {
        matches!(self, Quadrant::TopLeft | Quadrant::TopRight)
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bounds and center of one quadrant in document space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadrantSpec {
    pub quadrant: Quadrant,
    pub bounds: BoundingBox,
    pub center: Point,
}

/// Bounds and center of `quadrant` on a page of the given size
pub fn quadrant_spec(quadrant: Quadrant, page: PageSize) -> QuadrantSpec {
    let half_w = page.width / 2.0;
    let half_h = page.height / 2.0;
    let x = if quadrant.is_left() { 0.0 } else { half_w };
    let y = if quadrant.is_top() { half_h } else { 0.0 };
    let bounds = BoundingBox::new(x, y, half_w, half_h);

    QuadrantSpec {
        quadrant,
        bounds,
        center: bounds.center(),
    }
}

/// All four quadrant specs in id order
pub fn quadrant_specs(page: PageSize) -> [QuadrantSpec; 4] {
    Quadrant::ALL.map(|q| quadrant_spec(q, page))
}

/// Center of `quadrant` in document space
pub fn quadrant_center(quadrant: Quadrant, page: PageSize) -> Point {
    quadrant_spec(quadrant, page).center
}

/// Quadrant containing `point`; bisector ties go left and top
pub fn quadrant_at(point: Point, width: f64, height: f64) -> Quadrant {
    let left = point.x <= width / 2.0;
    let top = point.y >= height / 2.0;
    match (top, left) {
        (true, true) => Quadrant::TopLeft,
        (true, false) => Quadrant::TopRight,
        (false, true) => Quadrant::BottomLeft,
        (false, false) => Quadrant::BottomRight,
    }
}

/// Clamp both coordinates into `[0, dimension]`
///
/// A negative dimension collapses its axis to 0.
pub fn clamp_to_page(point: Point, width: f64, height: f64) -> Point {
    Point::new(point.x.min(width).max(0.0), point.y.min(height).max(0.0))
}
