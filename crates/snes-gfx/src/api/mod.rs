//! Public API for the snes-gfx crate.
//!
//! This module provides the pipeline entry point: [`ConvertOptions`],
//! the [`Converter`] that runs it and the [`ConvertError`] type.

mod converter;
mod error;
mod options;

pub use converter::{palette_stream_size, ConvertWarning, Converter, EncodedImage};
pub use error::ConvertError;
pub use options::{ConvertOptions, PaletteScope};
