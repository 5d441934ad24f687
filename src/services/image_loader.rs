//! Image decoding into pixel grids.

use crate::error::LoadError;
use image::{DynamicImage, ImageReader};
use snes_gfx::color::adjust_gamma_slice;
use snes_gfx::PixelGrid;
use std::path::Path;

/// Decode an image file into an RGB grid with `gamma_in` applied.
///
/// The format is detected from the file contents. Grayscale is expanded to
/// RGB, alpha is dropped, and components are normalized to `[0, 1]`
/// regardless of the source bit depth.
pub fn load_grid(path: &Path, gamma_in: f32) -> Result<PixelGrid, LoadError> {
    let image = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?
        .decode()
        .map_err(|source| LoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        color = ?image.color(),
        "Decoded image"
    );

    grid_from_image(&image, gamma_in).map_err(|source| LoadError::Grid {
        path: path.to_path_buf(),
        source,
    })
}

/// Convert a decoded image into an RGB grid with `gamma_in` applied.
pub fn grid_from_image(
    image: &DynamicImage,
    gamma_in: f32,
) -> Result<PixelGrid, snes_gfx::ConvertError> {
    let rgb = image.to_rgb32f();
    let (width, height) = rgb.dimensions();
    let mut data = rgb.into_raw();
    adjust_gamma_slice(&mut data, gamma_in);
    PixelGrid::new(width as usize, height as usize, 3, data)
}
