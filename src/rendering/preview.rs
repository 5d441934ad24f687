use crate::error::PreviewError;
use snes_gfx::encode::cgram::{color_word, decode_color_word};
use snes_gfx::encode::planar::{decode_tile_row, tile_row_size, TILE_SIZE};
use snes_gfx::encode::BitDepth;
use snes_gfx::{EncodedImage, Palette};
use std::io::Cursor;

/// Renders the encoded tile data back to a PNG as the console would show it.
///
/// Colors go through the same 5-bit quantization as the palette stream, so
/// the preview shows the real color resolution. The PNG format is chosen from
/// the palette layout:
/// - One palette → indexed color type 3 with PLTE chunk, 2/4/8-bit
/// - One palette per scanline → RGB, 8-bit
pub struct PreviewRenderer {
    depth: BitDepth,
    gamma_out: f32,
}

impl PreviewRenderer {
    pub fn new(depth: BitDepth, gamma_out: f32) -> Self {
        Self { depth, gamma_out }
    }

    /// Render `image`, whose encoded area is `width` x `height` pixels
    /// (both multiples of the tile size).
    pub fn render_to_png(
        &self,
        image: &EncodedImage,
        width: usize,
        height: usize,
    ) -> Result<Vec<u8>, PreviewError> {
        if width == 0 || height == 0 || width % TILE_SIZE != 0 || height % TILE_SIZE != 0 {
            return Err(PreviewError::UnsupportedDimensions { width, height });
        }

        let indices = self.decode_indices(image.chr(), width, height)?;

        let (color_type, bit_depth, plte, data) = match image.palettes() {
            [palette] => {
                let plte: Vec<u8> = palette.iter().flat_map(|c| self.console_rgb(c)).collect();
                let (depth, bits) = match self.depth {
                    BitDepth::Two => (png::BitDepth::Two, 2),
                    BitDepth::Four => (png::BitDepth::Four, 4),
                    BitDepth::Eight => (png::BitDepth::Eight, 8),
                };
                let packed = if bits == 8 {
                    indices
                } else {
                    pack_nbits(&indices, width, bits)
                };
                (png::ColorType::Indexed, depth, Some(plte), packed)
            }
            palettes => {
                let rgb = self.scanline_rgb(&indices, width, palettes);
                (png::ColorType::Rgb, png::BitDepth::Eight, None, rgb)
            }
        };

        encode_png(width, height, color_type, bit_depth, plte.as_deref(), &data)
    }

    /// Row-major palette indices of the encoded area.
    fn decode_indices(
        &self,
        chr: &[u8],
        width: usize,
        height: usize,
    ) -> Result<Vec<u8>, PreviewError> {
        let tiles = width / TILE_SIZE;
        let row_bytes = tile_row_size(tiles, self.depth);
        let mut indices = Vec::with_capacity(width * height);

        for block in 0..height / TILE_SIZE {
            let start = block * row_bytes;
            let bytes = chr.get(start..).unwrap_or_default();
            for row in decode_tile_row(bytes, tiles, self.depth)? {
                indices.extend_from_slice(&row);
            }
        }

        Ok(indices)
    }

    /// Expand indices to RGB using each scanline's own palette.
    fn scanline_rgb(&self, indices: &[u8], width: usize, palettes: &[Palette]) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(indices.len() * 3);
        for (row, palette) in indices.chunks(width).zip(palettes) {
            let colors: Vec<[u8; 3]> = palette.iter().map(|c| self.console_rgb(c)).collect();
            for &idx in row {
                rgb.extend_from_slice(&colors[idx as usize]);
            }
        }
        rgb
    }

    /// 8-bit RGB of a palette color after 5-bit encoding.
    fn console_rgb(&self, color: &[f32]) -> [u8; 3] {
        decode_color_word(color_word(color, self.gamma_out)).map(|v| (v << 3) | (v >> 2))
    }
}

fn encode_png(
    width: usize,
    height: usize,
    color_type: png::ColorType,
    bit_depth: png::BitDepth,
    plte: Option<&[u8]>,
    data: &[u8],
) -> Result<Vec<u8>, PreviewError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width as u32, height as u32);
        encoder.set_color(color_type);
        encoder.set_depth(bit_depth);
        encoder.set_compression(png::Compression::Fast);
        if let Some(plte) = plte {
            encoder.set_palette(plte);
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| PreviewError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(data)
            .map_err(|e| PreviewError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Pack pixel values into N-bit PNG row data (2 or 4 bits per pixel).
fn pack_nbits(indices: &[u8], width: usize, bits: u8) -> Vec<u8> {
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = width.div_ceil(pixels_per_byte);
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * (indices.len() / width));

    for row in indices.chunks(width) {
        for group in row.chunks(pixels_per_byte) {
            let byte = group.iter().enumerate().fold(0u8, |byte, (i, &idx)| {
                let shift = (8 - bits) - i as u8 * bits;
                byte | ((idx & mask) << shift)
            });
            packed.push(byte);
        }
    }

    packed
}
