//! Palettes and palette generation.
//!
//! [`Palette`] is the fixed, ordered color table that indices point into and
//! also carries the nearest-color quantizer. [`PaletteGenerator`] builds
//! palettes from pixel point sets with either [`median_cut`] or [`KMeans`].

mod error;
mod generator;
mod kmeans;
mod median_cut;
mod palette;

pub use error::PaletteError;
pub use generator::{PaletteGenerator, QuantizeMode};
pub use kmeans::KMeans;
pub use median_cut::median_cut;
pub use palette::Palette;
