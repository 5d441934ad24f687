#![allow(clippy::module_inception, clippy::needless_range_loop)]

//! snes-gfx: palette quantization, dithering and planar tile encoding for
//! SNES graphics
//!
//! This library turns RGB pixel data into the two byte streams the console's
//! video hardware consumes: planar 8x8 tiles of palette indices ("chr") and
//! 15-bit BGR palettes ("pal").
//!
//! # Quick Start
//!
//! The [`Converter`] is the primary entry point:
//!
//! ```
//! use snes_gfx::{ConvertOptions, Converter, PixelGrid};
//! use snes_gfx::dither::DitherKernel;
//!
//! let mut grid = PixelGrid::from_fn(8, 8, 3, |x, y, _| (x + y) as f32 / 14.0);
//! let converter = Converter::new(ConvertOptions::new().kernel(DitherKernel::FloydSteinberg));
//!
//! let image = converter.convert(&mut grid).unwrap();
//! assert_eq!(image.chr().len(), 32);
//! assert_eq!(image.palette().unwrap().len(), 32);
//! ```
//!
//! # Pipeline
//!
//! 1. [`PaletteGenerator`]: median cut or k-means over the whole image, or
//!    over a window of scanlines around every line
//!    ([`PaletteScope::Scanline`])
//! 2. [`dither::dither_line`]: nearest-color quantization with optional
//!    serpentine error diffusion, mutating the [`PixelGrid`] in place
//! 3. [`encode::planar`]: bitplane pairs per 8x8 tile
//! 4. [`encode::cgram`]: palette words with output gamma undone
//!
//! Processing of one image is strictly sequential: every pixel may depend on
//! error diffused by every pixel before it.
//!
//! # Input
//!
//! A [`PixelGrid`] of RGB values in `[0, 1]`, already gamma adjusted. Decoding
//! image files is left to the caller.

pub mod api;
pub mod color;
pub mod dither;
pub mod encode;
pub mod grid;
pub mod palette;

mod domain_tests;

pub use api::{ConvertError, ConvertOptions, ConvertWarning, Converter, EncodedImage, PaletteScope};
pub use dither::{DitherKernel, DitherOptions};
pub use encode::BitDepth;
pub use grid::PixelGrid;
pub use palette::{Palette, PaletteError, PaletteGenerator, QuantizeMode};
