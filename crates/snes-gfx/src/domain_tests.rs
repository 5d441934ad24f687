//! Domain-critical regression tests for snes-gfx.
//!
//! These tests guard properties the console formats depend on. Each test
//! documents the regression it catches.

#[cfg(test)]
mod domain_tests {
    use crate::api::{ConvertOptions, Converter, PaletteScope};
    use crate::dither::{dither_line, DitherKernel, DitherOptions, Kernel};
    use crate::encode::cgram::{color_word, decode_color_word};
    use crate::encode::planar::{decode_tile_row, encode_tile_row};
    use crate::encode::BitDepth;
    use crate::grid::PixelGrid;
    use crate::palette::{median_cut, Palette, PaletteGenerator, QuantizeMode};
    use pretty_assertions::assert_eq;

    /// 16 clearly separated RGB colors.
    fn sixteen_colors() -> Vec<[f32; 3]> {
        (0..16)
            .map(|i| {
                [
                    (i & 1) as f32,
                    ((i >> 1) & 1) as f32,
                    ((i >> 2) & 3) as f32 / 3.0,
                ]
            })
            .collect()
    }

    // ========================================================================
    // End-to-end stream shapes
    // ========================================================================

    /// If this breaks, it means: the stream sizes drifted from the hardware
    /// layout. One 8x8 tile at 4bpp is 2 plane pairs x 8 rows = 16 words
    /// (32 bytes) and a 16-color palette is 16 words.
    #[test]
    fn test_single_tile_sixteen_colors() {
        let colors = sixteen_colors();
        let mut grid = PixelGrid::from_fn(8, 8, 3, |x, y, c| colors[(y * 8 + x) % 16][c]);

        for mode in [QuantizeMode::KMeans, QuantizeMode::MedianCut] {
            let image = Converter::new(ConvertOptions::new().mode(mode))
                .convert(&mut grid.clone())
                .unwrap();
            assert_eq!(image.chr().len(), 32, "{mode:?}");
            assert_eq!(image.palette().map(<[u8]>::len), Some(32), "{mode:?}");

            // Every pixel is an exact palette color, so decoding the tile
            // through the palette reproduces the image.
            let palette = &image.palettes()[0];
            let rows = decode_tile_row(image.chr(), 1, BitDepth::Four).unwrap();
            for (y, row) in rows.iter().enumerate() {
                for (x, &idx) in row.iter().enumerate() {
                    assert_eq!(palette.color(idx as usize), grid.pixel(x, y), "{mode:?} ({x}, {y})");
                }
            }
        }

        // Dithering an exact-color image changes nothing
        let before = grid.clone();
        Converter::new(ConvertOptions::new().kernel(DitherKernel::FloydSteinberg))
            .convert(&mut grid)
            .unwrap();
        assert_eq!(grid, before);
    }

    /// If this breaks, it means: tile encoding depends on tile position, so
    /// duplicate tiles in VRAM would no longer deduplicate.
    #[test]
    fn test_identical_tiles_encode_identically() {
        let colors = sixteen_colors();
        let mut grid = PixelGrid::from_fn(16, 8, 3, |x, y, c| colors[(x % 8 + y * 3) % 16][c]);
        let image = Converter::new(ConvertOptions::new().mode(QuantizeMode::MedianCut))
            .convert(&mut grid)
            .unwrap();
        let chr = image.chr();
        assert_eq!(chr.len(), 64);
        assert_eq!(&chr[..32], &chr[32..]);
    }

    // ========================================================================
    // Bitplane layout
    // ========================================================================

    /// If this breaks, it means: a bit of some index lands in the wrong plane
    /// or wrong column. Every one of the 16 values must survive encoding.
    #[test]
    fn test_four_bpp_round_trip_all_indices() {
        let rows: Vec<Vec<u8>> = (0..8)
            .map(|y| (0..16).map(|x| ((x + y * 2) % 16) as u8).collect())
            .collect();
        let seen: std::collections::HashSet<u8> = rows.iter().flatten().copied().collect();
        assert_eq!(seen.len(), 16);

        let mut chr = Vec::new();
        encode_tile_row(&rows, BitDepth::Four, &mut chr);
        let decoded = decode_tile_row(&chr, 2, BitDepth::Four).unwrap();
        assert_eq!(decoded.to_vec(), rows);
    }

    // ========================================================================
    // Palette encoding
    // ========================================================================

    /// If this breaks, it means: black or white no longer hit the ends of the
    /// 5-bit range, or rounding is not monotonic.
    #[test]
    fn test_palette_encoder_saturating_and_monotonic() {
        assert_eq!(decode_color_word(color_word(&[0.0, 0.0, 0.0], 1.0)), [0, 0, 0]);
        assert_eq!(decode_color_word(color_word(&[1.0, 1.0, 1.0], 1.0)), [31, 31, 31]);

        for gamma in [1.0, 1.8, 2.2] {
            let mut previous = [0u8; 3];
            for i in 0..=255 {
                let v = i as f32 / 255.0;
                let components = decode_color_word(color_word(&[v, v, v], gamma));
                assert!(components >= previous, "gamma {gamma} at {v}");
                previous = components;
            }
            assert_eq!(previous, [31, 31, 31]);
        }
    }

    // ========================================================================
    // Palette generation never fails on degenerate input
    // ========================================================================

    /// If this breaks, it means: a flat image (or a tiny window) would abort
    /// conversion instead of producing a padded palette.
    #[test]
    fn test_exact_palette_sizes_on_degenerate_input() {
        let flat = vec![0.2_f32; 3 * 40];
        let two_colors: Vec<f32> = (0..40)
            .flat_map(|i| if i % 2 == 0 { [0.0; 3] } else { [1.0; 3] })
            .collect();

        for points in [&flat, &two_colors] {
            for count in [4, 16, 256] {
                assert_eq!(median_cut(points, 3, count).unwrap().len(), count);
                for mode in [QuantizeMode::KMeans, QuantizeMode::MiniBatchKMeans] {
                    let palette = PaletteGenerator::new(mode, count)
                        .generate(points, 3, None)
                        .unwrap();
                    assert_eq!(palette.len(), count, "{mode:?} {count}");
                }
            }
        }
    }

    /// If this breaks, it means: duplicate palette entries make index choice
    /// nondeterministic, and two runs could emit different chr data.
    #[test]
    fn test_tie_break_prefers_lowest_index() {
        let palette = Palette::from_colors(&[[0.9, 0.1, 0.1], [0.2, 0.4, 0.6], [0.2, 0.4, 0.6]]);
        assert_eq!(palette.find_nearest(&[0.2, 0.4, 0.6]), 1);
        assert_eq!(palette.find_nearest(&[0.25, 0.4, 0.6]), 1);
    }

    // ========================================================================
    // Error diffusion
    // ========================================================================

    /// If this breaks, it means: the kernel path does something beyond
    /// diffusion (extra rounding, different quantizer) that the no-dither
    /// path does not.
    #[test]
    fn test_zero_kernel_equals_no_dither() {
        let palette = Palette::from_colors(&sixteen_colors());
        let source = PixelGrid::from_fn(24, 6, 3, |x, y, c| {
            ((x * 5 + y * 3 + c * 11) % 13) as f32 / 12.0
        });
        let zero = Kernel::from_matrix(&[[0.0, 0.0, 0.0, 0.0, 0.0]; 3], 48.0);

        let mut a = source.clone();
        let mut b = source;
        for y in 0..6 {
            assert_eq!(
                dither_line(&mut a, y, &palette, &DitherOptions::new()),
                dither_line(&mut b, y, &palette, &DitherOptions::new().kernel(zero.clone())),
            );
        }
    }

    /// If this breaks, it means: odd lines are no longer scanned
    /// right-to-left, and error piles up on one side of the image.
    #[test]
    fn test_serpentine_distinguishes_two_line_image() {
        let palette = Palette::from_colors(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);
        let run = |serpentine: bool| {
            let mut grid = PixelGrid::from_fn(8, 2, 3, |_, _, _| 0.3);
            let options = DitherOptions::new()
                .kernel(DitherKernel::FloydSteinberg)
                .serpentine(serpentine);
            (0..2)
                .map(|y| dither_line(&mut grid, y, &palette, &options))
                .collect::<Vec<_>>()
        };

        let forward = run(false);
        let serpentine = run(true);
        assert_eq!(forward[0], serpentine[0]);
        assert_ne!(forward[1], serpentine[1]);
    }

    /// If this breaks, it means: an exact palette color produces nonzero
    /// error, so flat areas would grow dither noise.
    #[test]
    fn test_uniform_palette_color_diffuses_nothing() {
        let palette = Palette::from_colors(&sixteen_colors());
        let target = palette.color(6).to_vec();

        for kernel in DitherKernel::ALL {
            for serpentine in [false, true] {
                let mut grid = PixelGrid::from_fn(16, 3, 3, |_, _, c| target[c]);
                let before = grid.clone();
                let options = DitherOptions::new().kernel(kernel).serpentine(serpentine);
                for y in 0..3 {
                    assert_eq!(dither_line(&mut grid, y, &palette, &options), vec![6; 16]);
                }
                assert_eq!(grid, before, "{kernel}");
            }
        }
    }

    // ========================================================================
    // Per-scanline palettes read the dithered grid
    // ========================================================================

    /// If this breaks, it means: scanline windows are being computed from a
    /// pristine copy of the image. They must see the error already diffused
    /// into the lines above and around the current line; existing output
    /// depends on that.
    #[test]
    fn test_scanline_window_reads_dithered_grid() {
        let source = PixelGrid::from_fn(8, 8, 3, |x, y, c| {
            ((x * 7 + y * 3 + c * 5) % 16) as f32 / 15.0
        });
        let options = ConvertOptions::scan16()
            .window(1)
            .mode(QuantizeMode::MedianCut)
            .kernel(DitherKernel::FloydSteinberg);
        let dither = options.dither_options().clone();

        let image = Converter::new(options).convert(&mut source.clone()).unwrap();

        // Replay by hand, generating each palette from the working grid
        let generator = PaletteGenerator::new(QuantizeMode::MedianCut, 16);
        let mut working = source.clone();
        let mut replayed = Vec::new();
        for line in 0..8 {
            let palette = generator.generate(working.window(line, 1), 3, None).unwrap();
            dither_line(&mut working, line, &palette, &dither);
            replayed.push(palette);
        }
        assert_eq!(image.palettes(), replayed.as_slice());

        // Palettes built from the untouched image would differ
        let differs = (0..8).any(|line| {
            let pristine = generator.generate(source.window(line, 1), 3, None).unwrap();
            image.palettes()[line] != pristine
        });
        assert!(differs);
    }

    /// If this breaks, it means: seeding no longer reaches the per-line
    /// k-means runs, or whole-image scope started emitting per-line palettes.
    #[test]
    fn test_scope_controls_palette_count() {
        let source = PixelGrid::from_fn(8, 16, 3, |x, y, c| {
            ((x + y * 2 + c) % 9) as f32 / 8.0
        });
        for (scope, expected) in [
            (PaletteScope::Image, 1),
            (PaletteScope::Scanline { window: 0 }, 16),
        ] {
            for seed in [false, true] {
                let image = Converter::new(ConvertOptions::new().scope(scope).seed(seed))
                    .convert(&mut source.clone())
                    .unwrap();
                assert_eq!(image.palettes().len(), expected, "{scope:?} seed={seed}");
                assert_eq!(
                    image.palette().map(<[u8]>::len),
                    Some(expected * 32),
                    "{scope:?} seed={seed}"
                );
            }
        }
    }
}
