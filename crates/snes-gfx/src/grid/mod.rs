//! The mutable pixel buffer shared by palette generation and dithering.

mod pixel_grid;

pub use pixel_grid::PixelGrid;
