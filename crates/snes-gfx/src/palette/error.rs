//! Error types for palette construction and generation.

use thiserror::Error;

/// Error type for palette construction and generation.
///
/// Degenerate point sets (too few distinct colors, all-identical pixels)
/// are NOT errors: generation pads the palette instead. These variants only
/// cover inputs no palette can be built from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// No colors provided
    #[error("palette cannot be empty")]
    Empty,

    /// Flat color storage is not a whole number of colors
    #[error("{len} components cannot be split into colors of {channels} channels")]
    Ragged {
        /// Number of components supplied
        len: usize,
        /// Channels per color
        channels: usize,
    },

    /// Median cut can only produce power-of-two palette sizes
    #[error("median cut needs a power-of-two palette size, got {0}")]
    NotPowerOfTwo(usize),

    /// Palette generation was handed an empty point set
    #[error("cannot generate a palette from zero pixels")]
    NoPoints,

    /// Seed palette and point set disagree on channel count
    #[error("seed palette has {seed} channels but points have {points}")]
    SeedChannels {
        /// Channels in the seed palette
        seed: usize,
        /// Channels in the point set
        points: usize,
    },
}
