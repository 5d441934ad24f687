//! Planar tile encoding.
//!
//! A tile row is 8 scanlines of palette indices cut into 8x8 tiles. Each tile
//! is written as one group per bitplane pair `(p, p + 1)`, and each group is
//! 8 words, one per tile row:
//!
//! ```text
//! bit:   15 ... 8   7 ... 0
//!        plane p+1  plane p
//!        x=0 .. 7   x=0 .. 7
//! ```
//!
//! The leftmost pixel lands in the most significant bit of each byte.

use super::BitDepth;
use crate::api::ConvertError;

/// Tile edge length in pixels.
pub const TILE_SIZE: usize = 8;

/// Bytes in one encoded tile row of `tiles` tiles.
#[inline]
pub fn tile_row_size(tiles: usize, depth: BitDepth) -> usize {
    tiles * depth.plane_pairs() * TILE_SIZE * 2
}

/// Bytes in the encoded pixel stream of a `width` x `height` image.
///
/// Partial tiles on the right and bottom edges are dropped.
#[inline]
pub fn chr_size(width: usize, height: usize, depth: BitDepth) -> usize {
    (height / TILE_SIZE) * tile_row_size(width / TILE_SIZE, depth)
}

/// Append the planar encoding of one tile row to `out`.
///
/// `rows` must hold exactly 8 index rows of equal length. Only
/// `width / 8` whole tiles are encoded; trailing columns are ignored.
///
/// # Panics
///
/// Panics if `rows.len() != 8`.
///
/// # Example
///
/// ```
/// use snes_gfx::encode::{planar, BitDepth};
///
/// let rows = vec![vec![1u8; 8]; 8];
/// let mut chr = Vec::new();
/// planar::encode_tile_row(&rows, BitDepth::Two, &mut chr);
/// // plane 0 fully set, plane 1 clear
/// assert_eq!(&chr[..2], &[0xff, 0x00]);
/// assert_eq!(chr.len(), 16);
/// ```
pub fn encode_tile_row<R: AsRef<[u8]>>(rows: &[R], depth: BitDepth, out: &mut Vec<u8>) {
    assert_eq!(rows.len(), TILE_SIZE, "a tile row is {TILE_SIZE} scanlines");

    let width = rows.iter().map(|r| r.as_ref().len()).min().unwrap_or(0);
    let tiles = width / TILE_SIZE;
    out.reserve(tile_row_size(tiles, depth));

    for tile in 0..tiles {
        let columns = tile * TILE_SIZE..(tile + 1) * TILE_SIZE;
        for plane in (0..depth.bits()).step_by(2) {
            for row in rows {
                let word = plane_pair_word(&row.as_ref()[columns.clone()], plane);
                out.extend_from_slice(&word.to_le_bytes());
            }
        }
    }
}

/// Decode one tile row back into 8 rows of `tiles * 8` indices.
///
/// # Errors
///
/// [`ConvertError::BufferSize`] if `bytes` is shorter than
/// [`tile_row_size`]`(tiles, depth)`.
pub fn decode_tile_row(
    bytes: &[u8],
    tiles: usize,
    depth: BitDepth,
) -> Result<[Vec<u8>; TILE_SIZE], ConvertError> {
    let expected = tile_row_size(tiles, depth);
    if bytes.len() < expected {
        return Err(ConvertError::BufferSize {
            expected,
            actual: bytes.len(),
        });
    }

    let mut rows: [Vec<u8>; TILE_SIZE] = std::array::from_fn(|_| vec![0u8; tiles * TILE_SIZE]);
    let mut words = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));

    for tile in 0..tiles {
        for plane in (0..depth.bits()).step_by(2) {
            for row in rows.iter_mut() {
                let word = words.next().unwrap_or(0);
                for x in 0..TILE_SIZE {
                    let bit = 7 - x;
                    let lo = ((word >> bit) & 1) as u8;
                    let hi = ((word >> (bit + 8)) & 1) as u8;
                    row[tile * TILE_SIZE + x] |= (lo << plane) | (hi << (plane + 1));
                }
            }
        }
    }

    Ok(rows)
}

/// One tile row of bitplanes `plane` (low byte) and `plane + 1` (high byte).
#[inline]
fn plane_pair_word(pixels: &[u8], plane: u8) -> u16 {
    pixels.iter().enumerate().fold(0u16, |word, (x, &idx)| {
        let bit = 7 - x;
        let lo = u16::from((idx >> plane) & 1);
        let hi = u16::from((idx >> (plane + 1)) & 1);
        word | (lo << bit) | (hi << (bit + 8))
    })
}
