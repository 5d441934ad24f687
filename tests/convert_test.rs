//! End-to-end conversion through the driver services.

mod common;

use common::{assert_chr_size, assert_valid_palette, tile_indices, Workspace};
use pretty_assertions::assert_eq;
use snes_gfx::DitherKernel;
use snesify::models::{AppConfig, Format, Quantizer};
use snesify::services::{build_shared_palette, convert_file, run_batch, write_shared_palette};

fn config(format: Format) -> AppConfig {
    AppConfig {
        format,
        ..Default::default()
    }
}

// ============================================================================
// Output sizes per format
// ============================================================================

#[test]
fn test_4bit_sizes() {
    let ws = Workspace::new();
    let input = ws.gradient_png("title.png", 32, 16);

    convert_file(&input, &config(Format::FourBit), None).unwrap();

    assert_chr_size(&ws.read("title.chr"), 8, 4);
    let pal = ws.read("title.pal");
    assert_eq!(pal.len(), 16 * 2);
    assert_valid_palette(&pal);
}

#[test]
fn test_2bit_sizes() {
    let ws = Workspace::new();
    let input = ws.gradient_png("font.png", 16, 8);

    convert_file(&input, &config(Format::TwoBit), None).unwrap();

    assert_chr_size(&ws.read("font.chr"), 2, 2);
    assert_eq!(ws.read("font.pal").len(), 4 * 2);
}

#[test]
fn test_8bit_sizes() {
    let ws = Workspace::new();
    let input = ws.gradient_png("photo.png", 8, 8);

    convert_file(&input, &config(Format::EightBit), None).unwrap();

    assert_chr_size(&ws.read("photo.chr"), 1, 8);
    let pal = ws.read("photo.pal");
    assert_eq!(pal.len(), 256 * 2);
    assert_valid_palette(&pal);
}

#[test]
fn test_scan16_palette_per_line() {
    let ws = Workspace::new();
    let input = ws.gradient_png("sky.png", 16, 16);
    let config = AppConfig {
        format: Format::Scan16,
        window: 1,
        quantizer: Quantizer::MedianCut,
        dither: Some(DitherKernel::FloydSteinberg),
        ..Default::default()
    };

    convert_file(&input, &config, None).unwrap();

    assert_chr_size(&ws.read("sky.chr"), 4, 4);
    let pal = ws.read("sky.pal");
    assert_eq!(pal.len(), 16 * 16 * 2);
    assert_valid_palette(&pal);
}

#[test]
fn test_partial_tiles_dropped() {
    let ws = Workspace::new();
    let input = ws.gradient_png("odd.png", 20, 11);

    let report = convert_file(&input, &config(Format::FourBit), None).unwrap();

    assert_chr_size(&ws.read("odd.chr"), 2, 4);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(
        report.warnings[0].to_string(),
        "20x11 is not a multiple of 8, only 16x8 encoded"
    );
}

// ============================================================================
// Pixel content
// ============================================================================

#[test]
fn test_grayscale_stripes_exact() {
    let ws = Workspace::new();
    let input = ws.stripes_gray_png("stripes.png", 8, 8);
    let config = AppConfig {
        format: Format::TwoBit,
        quantizer: Quantizer::MedianCut,
        ..Default::default()
    };

    convert_file(&input, &config, None).unwrap();

    let chr = ws.read("stripes.chr");
    let pal = ws.read("stripes.pal");
    let indices = tile_indices(&chr, 2);
    let (even, odd) = (indices[0][0], indices[0][1]);
    assert_ne!(even, odd);
    for row in indices {
        for (x, &idx) in row.iter().enumerate() {
            assert_eq!(idx, if x % 2 == 0 { even } else { odd });
        }
    }

    let word = |i: u8| u16::from_le_bytes([pal[i as usize * 2], pal[i as usize * 2 + 1]]);
    assert_eq!(word(even), 0x0000);
    assert_eq!(word(odd), 0x7fff);
}

#[test]
fn test_same_rng_seed_same_output() {
    let ws = Workspace::new();
    let first = ws.gradient_png("a.png", 16, 16);
    let config = AppConfig {
        rng_seed: 7,
        dither: Some(DitherKernel::Atkinson),
        ..Default::default()
    };

    convert_file(&first, &config, None).unwrap();
    let chr = ws.read("a.chr");
    let pal = ws.read("a.pal");

    convert_file(&first, &config, None).unwrap();
    assert_eq!(ws.read("a.chr"), chr);
    assert_eq!(ws.read("a.pal"), pal);
}

// ============================================================================
// Output locations
// ============================================================================

#[test]
fn test_out_dir() {
    let ws = Workspace::new();
    let input = ws.gradient_png("title.png", 8, 8);
    let out = ws.file("build");
    std::fs::create_dir(&out).unwrap();
    let config = AppConfig {
        out_dir: Some(out.clone()),
        ..Default::default()
    };

    let report = convert_file(&input, &config, None).unwrap();

    assert_eq!(report.chr_path, out.join("title.chr"));
    assert!(out.join("title.pal").exists());
    assert!(!ws.file("title.chr").exists());
}

#[test]
fn test_preview_written_next_to_outputs() {
    let ws = Workspace::new();
    let input = ws.gradient_png("title.png", 16, 16);
    let config = AppConfig {
        format: Format::Scan16,
        preview: true,
        ..Default::default()
    };

    convert_file(&input, &config, None).unwrap();

    let preview = image::open(ws.file("title.preview.png")).unwrap();
    assert_eq!((preview.width(), preview.height()), (16, 16));
}

// ============================================================================
// Shared palette and batches
// ============================================================================

#[test]
fn test_shared_palette_batch() {
    let ws = Workspace::new();
    let files = vec![
        ws.solid_png("red.png", 8, 8, [255, 0, 0]),
        ws.solid_png("green.png", 8, 8, [0, 255, 0]),
    ];
    let config = config(Format::FourBit);

    let palette = build_shared_palette(&files, &config).unwrap();
    write_shared_palette(&ws.file("shared.pal"), &palette, config.gamma_out).unwrap();
    let summary = run_batch(&files, &config, Some(&palette));

    assert_eq!(summary.converted, 2);
    let shared = ws.read("shared.pal");
    assert_eq!(shared.len(), 16 * 2);
    assert_valid_palette(&shared);
    assert!(!ws.file("red.pal").exists());
    assert!(!ws.file("green.pal").exists());

    // Both images index into the same palette, at different entries
    let red = tile_indices(&ws.read("red.chr"), 4)[0][0];
    let green = tile_indices(&ws.read("green.chr"), 4)[0][0];
    let word = |i: u8| u16::from_le_bytes([shared[i as usize * 2], shared[i as usize * 2 + 1]]);
    assert_eq!(word(red), 0x001f);
    assert_eq!(word(green), 0x03e0);
}

#[test]
fn test_batch_continues_past_bad_files() {
    let ws = Workspace::new();
    let files = vec![
        ws.garbage("broken.png"),
        ws.file("missing.png"),
        ws.gradient_png("ok.png", 8, 8),
    ];

    let summary = run_batch(&files, &AppConfig::default(), None);

    assert_eq!(summary.converted, 1);
    assert_eq!(summary.failed, 2);
    assert!(ws.file("ok.chr").exists());
    assert!(!ws.file("broken.chr").exists());
}
