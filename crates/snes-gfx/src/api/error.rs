//! Error type for the conversion pipeline.

use thiserror::Error;

use crate::palette::PaletteError;

/// Everything that stops a conversion before it produces output.
///
/// All variants are configuration or input-shape problems detected before any
/// pixel is processed. Degenerate images (few colors, flat areas) and
/// non-tile-aligned dimensions are not errors.
///
/// # Example
///
/// ```
/// use snes_gfx::{ConvertError, PixelGrid};
///
/// let err = PixelGrid::new(0, 8, 3, vec![]).unwrap_err();
/// assert!(matches!(err, ConvertError::EmptyImage { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    #[error("unsupported bit depth {0} (expected 2, 4 or 8)")]
    InvalidBitDepth(u8),

    #[error("image has no pixels ({width}x{height}, {channels} channels)")]
    EmptyImage {
        width: usize,
        height: usize,
        channels: usize,
    },

    #[error("pixel buffer holds {actual} values, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("expected {expected} color channels, got {actual}")]
    ChannelCount { expected: usize, actual: usize },

    #[error("output gamma must be positive and finite, got {0}")]
    InvalidGamma(f32),

    #[error("a shared palette cannot be combined with per-scanline palettes")]
    SharedPaletteScope,

    #[error("shared palette has {actual} colors, expected {expected}")]
    SharedPaletteSize { expected: usize, actual: usize },

    #[error(transparent)]
    Palette(#[from] PaletteError),
}
