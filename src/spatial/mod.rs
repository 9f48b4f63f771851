//! Aspect-ratio arithmetic, tile-grid sizing, and raster paste operations

/// Reduced aspect ratios and their pixel-size arithmetic
pub mod aspect;
/// Tile grid computation from image and tile aspect ratios
pub mod grid;
/// Bounds-checked raster copy into a destination canvas
pub mod paste;

pub use aspect::AspectRatio;
pub use grid::{Cell, TileGrid};
pub use paste::paste;
