//! Snesify - convert images to SNES tile and palette data
//!
//! The command-line driver around the `snes-gfx` library: configuration,
//! image decoding, output file naming and batch processing.
//! This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
