//! Display model → tray visuals.
//!
//! [`Composer`] decides the cell layout from a [`tray_core::DisplayModel`];
//! a [`RenderBackend`] optionally turns those cells into an image.  Whenever
//! no image comes out, the summary text is used instead.

pub mod backend;
pub mod composer;
pub mod svg;

pub use backend::{Raster, Rasterizer, RenderBackend, SvgBackend, TextBackend};
pub use composer::{Cell, CellContent, Composer, Composition, VisualOutput};
pub use svg::SvgRasterizer;
