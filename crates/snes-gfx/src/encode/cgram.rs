//! Palette encoding as 15-bit BGR color words.
//!
//! ```text
//! bit:  15  14..10  9..5  4..0
//!        0   blue   green  red
//! ```

use crate::api::ConvertError;
use crate::color::adjust_gamma;
use crate::palette::Palette;

/// Largest 5-bit channel value.
const CHANNEL_MAX: f32 = 31.0;

/// Encode one RGB color in `[0, 1]` as a color word.
///
/// Each channel is mapped back to display space with `x^(1 / gamma_out)`,
/// clamped to `[0, 1]` and rounded half-up to 5 bits.
///
/// # Example
///
/// ```
/// use snes_gfx::encode::cgram::color_word;
///
/// assert_eq!(color_word(&[1.0, 0.0, 0.0], 1.0), 0x001f);
/// assert_eq!(color_word(&[0.0, 0.0, 1.0], 1.0), 0x7c00);
/// assert_eq!(color_word(&[1.0, 1.0, 1.0], 2.2), 0x7fff);
/// ```
pub fn color_word(rgb: &[f32], gamma_out: f32) -> u16 {
    let channel = |c: usize| -> u16 {
        let value = adjust_gamma(rgb[c].clamp(0.0, 1.0), 1.0 / gamma_out).clamp(0.0, 1.0);
        (value * CHANNEL_MAX + 0.5) as u16
    };
    (channel(2) << 10) | (channel(1) << 5) | channel(0)
}

/// Append one little-endian color word per palette entry to `out`.
///
/// # Errors
///
/// [`ConvertError::ChannelCount`] if the palette is not RGB.
pub fn encode_palette(
    palette: &Palette,
    gamma_out: f32,
    out: &mut Vec<u8>,
) -> Result<(), ConvertError> {
    if palette.channels() != 3 {
        return Err(ConvertError::ChannelCount {
            expected: 3,
            actual: palette.channels(),
        });
    }

    out.reserve(palette.len() * 2);
    for color in palette.iter() {
        out.extend_from_slice(&color_word(color, gamma_out).to_le_bytes());
    }
    Ok(())
}

/// Split a color word into its 5-bit `[red, green, blue]` components.
#[inline]
pub fn decode_color_word(word: u16) -> [u8; 3] {
    [
        (word & 0x1f) as u8,
        ((word >> 5) & 0x1f) as u8,
        ((word >> 10) & 0x1f) as u8,
    ]
}
