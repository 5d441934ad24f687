//! Checks on the tile and palette byte streams.

/// Assert that `chr` holds `tiles` tiles at `bpp` bits per pixel.
pub fn assert_chr_size(chr: &[u8], tiles: usize, bpp: usize) {
    assert_eq!(
        chr.len(),
        tiles * 8 * bpp,
        "expected {tiles} tiles at {bpp}bpp"
    );
}

/// Assert that every palette word has bit 15 clear.
pub fn assert_valid_palette(pal: &[u8]) {
    assert_eq!(pal.len() % 2, 0, "palette stream has an odd length");
    for (i, word) in pal.chunks_exact(2).enumerate() {
        let word = u16::from_le_bytes([word[0], word[1]]);
        assert_eq!(word & 0x8000, 0, "color {i} has bit 15 set: {word:04x}");
    }
}

/// Palette indices of one 8x8 tile at `bpp` bits per pixel.
pub fn tile_indices(tile: &[u8], bpp: usize) -> [[u8; 8]; 8] {
    let mut indices = [[0u8; 8]; 8];
    for (pair, planes) in tile.chunks_exact(16).take(bpp / 2).enumerate() {
        for y in 0..8 {
            let (low, high) = (planes[y * 2], planes[y * 2 + 1]);
            for x in 0..8 {
                let shift = 7 - x;
                let bits = ((low >> shift) & 1) | (((high >> shift) & 1) << 1);
                indices[y][x] |= bits << (pair * 2);
            }
        }
    }
    indices
}
