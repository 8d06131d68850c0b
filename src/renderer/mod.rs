//! SVG preview of namecard pages
//!
//! This module draws a page of the layout model onto a scaled, Y-down surface
//! and turns pointer input on that surface back into model edits.

pub mod config;
pub mod interaction;
pub mod preview;
pub mod svg;
pub mod transform;

pub use config::PreviewConfig;
pub use interaction::{DragState, PointerSession};
pub use preview::{is_out_of_home, Backdrop, PreviewFont, PreviewRenderer};
pub use transform::{ScreenTransform, SurfaceMeasure};
