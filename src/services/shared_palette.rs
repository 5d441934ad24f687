//! One palette for a whole set of images.

use crate::error::{ConfigError, SharedPaletteError};
use crate::models::{AppConfig, Format};
use crate::services::image_loader::load_grid;
use snes_gfx::encode::cgram;
use snes_gfx::{Palette, PaletteGenerator};
use std::path::{Path, PathBuf};

/// Generate a single palette from the pooled pixels of every input.
///
/// Uses the configured quantizer and bit depth, so the palette has exactly
/// `2^bpp` colors. Not available for the scan16 format, which needs a
/// palette per scanline.
pub fn build_shared_palette(
    files: &[PathBuf],
    config: &AppConfig,
) -> Result<Palette, SharedPaletteError> {
    if config.format == Format::Scan16 {
        return Err(ConfigError::SharedPaletteWithScan16.into());
    }
    if files.is_empty() {
        return Err(SharedPaletteError::NoInputs);
    }

    let mut points = Vec::new();
    for path in files {
        let grid = load_grid(path, config.gamma_in)?;
        points.extend_from_slice(grid.as_slice());
    }

    let depth = config.format.depth();
    let palette = PaletteGenerator::new(config.quantize_mode(), depth.colors())
        .seed_with_median_cut(config.seed)
        .rng_seed(config.rng_seed)
        .generate(&points, 3, None)?;

    tracing::info!(
        files = files.len(),
        pixels = points.len() / 3,
        colors = palette.len(),
        "Built shared palette"
    );
    Ok(palette)
}

/// Write `palette` as a palette stream.
pub fn write_shared_palette(
    path: &Path,
    palette: &Palette,
    gamma_out: f32,
) -> Result<(), SharedPaletteError> {
    let mut bytes = Vec::with_capacity(palette.len() * 2);
    cgram::encode_palette(palette, gamma_out, &mut bytes)?;
    std::fs::write(path, &bytes).map_err(|source| SharedPaletteError::Write {
        path: path.to_path_buf(),
        source,
    })
}
