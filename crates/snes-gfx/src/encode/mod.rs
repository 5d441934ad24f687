//! Byte encoders for the console's video memory formats.
//!
//! - [`planar`]: 8x8 tiles of palette indices as interleaved bitplane pairs
//!   (the "chr" pixel stream)
//! - [`cgram`]: palettes as 15-bit BGR words (the "pal" palette stream)
//!
//! Both streams are sequences of little-endian 16-bit words.

pub mod cgram;
pub mod planar;

use std::fmt;

use crate::api::ConvertError;

/// Bits per pixel index. Determines the palette size and bitplane count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BitDepth {
    /// 4 colors, 2 bitplanes
    Two,
    /// 16 colors, 4 bitplanes
    #[default]
    Four,
    /// 256 colors, 8 bitplanes
    Eight,
}

impl BitDepth {
    /// Number of bitplanes (the bpp value itself).
    #[inline]
    pub fn bits(self) -> u8 {
        match self {
            BitDepth::Two => 2,
            BitDepth::Four => 4,
            BitDepth::Eight => 8,
        }
    }

    /// Palette size, `2^bits`.
    #[inline]
    pub fn colors(self) -> usize {
        1 << self.bits()
    }

    /// Number of bitplane pairs, one 16-bit word per tile row each.
    #[inline]
    pub fn plane_pairs(self) -> usize {
        usize::from(self.bits() / 2)
    }
}

impl TryFrom<u8> for BitDepth {
    type Error = ConvertError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            2 => Ok(BitDepth::Two),
            4 => Ok(BitDepth::Four),
            8 => Ok(BitDepth::Eight),
            other => Err(ConvertError::InvalidBitDepth(other)),
        }
    }
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bpp", self.bits())
    }
}
