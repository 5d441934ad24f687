//! HiROM internal header checksum.

use crate::error::ChecksumError;
use std::ops::Range;

/// Checksum complement, then checksum, as little-endian words.
const COMPLEMENT: Range<usize> = 0xffdc..0xffde;
const CHECKSUM: Range<usize> = 0xffde..0xffe0;

/// Smallest image that contains a HiROM header.
pub const MIN_ROM_SIZE: usize = 0x10000;

/// Recompute the header checksum of a HiROM image in place.
///
/// The checksum is the 16-bit sum of every byte, computed with the header
/// fields set to `ffff 0000`, the value they sum to once filled in. Returns
/// the new checksum. ExHiROM and LoROM layouts are not handled.
pub fn fix_hirom_checksum(rom: &mut [u8]) -> Result<u16, ChecksumError> {
    if rom.len() < MIN_ROM_SIZE {
        return Err(ChecksumError::TooSmall {
            size: rom.len(),
            min: MIN_ROM_SIZE,
        });
    }

    rom[COMPLEMENT].copy_from_slice(&[0xff, 0xff]);
    rom[CHECKSUM].copy_from_slice(&[0x00, 0x00]);

    let sum = rom
        .iter()
        .fold(0u16, |sum, &byte| sum.wrapping_add(u16::from(byte)));

    rom[CHECKSUM].copy_from_slice(&sum.to_le_bytes());
    rom[COMPLEMENT].copy_from_slice(&(!sum).to_le_bytes());

    tracing::debug!(size = rom.len(), checksum = %format!("{sum:04x}"), "Fixed checksum");
    Ok(sum)
}
