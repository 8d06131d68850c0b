//! Layout engine for namecard placement
//!
//! This module owns the document-space geometry: quadrant assignment, the
//! per-name placement model, and the text layout shared by preview and output.

pub mod config;
pub mod error;
pub mod model;
pub mod quadrant;
pub mod text;
pub mod types;

pub use config::LayoutConfig;
pub use error::LayoutError;
pub use model::{page_count_for, page_of, LayoutModel, PlacementEntry};
pub use quadrant::{
    clamp_to_page, quadrant_at, quadrant_center, quadrant_spec, quadrant_specs, Quadrant,
    QuadrantSpec, NAMES_PER_PAGE,
};
pub use text::{spaced_width, TextBlock, TextLayoutEngine, TextMeasure, TextRun};
pub use types::*;
