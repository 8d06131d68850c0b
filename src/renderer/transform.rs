//! Conversion between document space and the preview surface
//!
//! Document space has its origin at the bottom-left with Y up; the surface has
//! its origin at the top-left with Y down. This is the only place the flip
//! happens.

use crate::layout::{PageSize, Point, TextMeasure};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTransform {
    scale: f64,
    page_height: f64,
}

impl ScreenTransform {
    pub fn new(scale: f64, page_height: f64) -> Self {
        Self { scale, page_height }
    }

    /// Transform for drawing `page` onto a surface `canvas_width` pixels wide
    pub fn fit_width(page: PageSize, canvas_width: f64) -> Self {
        let scale = if page.width > 0.0 {
            canvas_width / page.width
        } else {
            1.0
        };
        Self::new(scale, page.height)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn to_screen(&self, point: Point) -> Point {
        Point::new(point.x * self.scale, (self.page_height - point.y) * self.scale)
    }

    pub fn to_document(&self, point: Point) -> Point {
        Point::new(point.x / self.scale, self.page_height - point.y / self.scale)
    }

    /// Document length to surface length
    pub fn length(&self, value: f64) -> f64 {
        value * self.scale
    }
}

/// Measures on the surface at scaled size and reports document units
#[derive(Debug, Clone, Copy)]
pub struct SurfaceMeasure<M> {
    inner: M,
    scale: f64,
}

impl<M: TextMeasure> SurfaceMeasure<M> {
    pub fn new(inner: M, scale: f64) -> Self {
        Self { inner, scale }
    }
}

impl<M: TextMeasure> TextMeasure for SurfaceMeasure<M> {
    fn measure(&self, text: &str, font_size: f64) -> f64 {
        if self.scale <= 0.0 {
            return self.inner.measure(text, font_size);
        }
        self.inner.measure(text, font_size * self.scale) / self.scale
    }
}
