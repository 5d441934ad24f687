//! Error diffusion dithering, one scanline at a time.
//!
//! Scanlines are dithered independently because a palette may change from
//! one line to the next (see [`PaletteScope::Scanline`]). Error diffused from
//! line `y` lands in the grid at lines `y..=y + max_dy` and is picked up when
//! those lines are processed, so lines must be dithered top to bottom.
//!
//! # Kernels
//!
//! - **Floyd-Steinberg**: 4 neighbors, 100% propagation
//! - **Jarvis-Judice-Ninke** and **Stucki**: 12 neighbors over 3 rows
//! - **Atkinson**: 75% propagation, keeps contrast on small palettes
//! - **Burkes** and the **Sierra family**: intermediate sizes
//!
//! [`PaletteScope::Scanline`]: crate::PaletteScope::Scanline

mod kernel;
mod options;

pub use kernel::{DitherKernel, Kernel, Tap, UnknownKernel};
pub use options::DitherOptions;

use crate::grid::PixelGrid;
use crate::palette::Palette;

/// Quantize scanline `line` of `grid` against `palette`.
///
/// Returns one palette index per column, always in left-to-right order.
///
/// With a kernel configured, each visited pixel is first clamped into
/// `[0, 1]` in place, then its quantization error (`pixel - chosen color`) is
/// added, weighted, to the kernel's neighbors. Neighbors outside the grid are
/// skipped. With serpentine scanning on, odd lines are walked right-to-left
/// with the kernel mirrored horizontally.
///
/// Without a kernel the grid is left untouched.
///
/// # Panics
///
/// Panics if `line` is out of bounds, if `palette` has a different channel
/// count than `grid`, or if `palette` has more than 256 entries (indices are
/// bytes).
///
/// # Example
///
/// ```
/// use snes_gfx::dither::{dither_line, DitherKernel, DitherOptions};
/// use snes_gfx::{Palette, PixelGrid};
///
/// let palette = Palette::from_colors(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);
/// let mut grid = PixelGrid::from_fn(8, 1, 3, |_, _, _| 0.5);
/// let options = DitherOptions::new().kernel(DitherKernel::FloydSteinberg);
///
/// let indices = dither_line(&mut grid, 0, &palette, &options);
/// assert_eq!(indices.len(), 8);
/// // 50% gray alternates between black and white
/// assert_eq!(indices.iter().filter(|&&i| i == 1).count(), 4);
/// ```
pub fn dither_line(
    grid: &mut PixelGrid,
    line: usize,
    palette: &Palette,
    options: &DitherOptions,
) -> Vec<u8> {
    assert!(line < grid.height(), "scanline {line} out of bounds");
    assert_eq!(
        palette.channels(),
        grid.channels(),
        "palette and image channel counts differ"
    );
    assert!(
        palette.len() <= 256,
        "palette of {} colors does not fit byte indices",
        palette.len()
    );

    let width = grid.width();
    let Some(kernel) = options.kernel_ref() else {
        return (0..width)
            .map(|x| palette.find_nearest(grid.pixel(x, line)) as u8)
            .collect();
    };

    let reverse = options.is_serpentine() && line % 2 == 1;
    let mirrored;
    let kernel = if reverse {
        mirrored = kernel.mirrored();
        &mirrored
    } else {
        kernel
    };

    let mut indices = vec![0u8; width];
    let mut error = vec![0.0f32; grid.channels()];

    let columns: Box<dyn Iterator<Item = usize>> = if reverse {
        Box::new((0..width).rev())
    } else {
        Box::new(0..width)
    };

    for x in columns {
        grid.clamp_pixel(x, line);
        let pixel = grid.pixel(x, line);
        let idx = palette.find_nearest(pixel);
        indices[x] = idx as u8;

        for ((e, &value), &chosen) in error.iter_mut().zip(pixel).zip(palette.color(idx)) {
            *e = value - chosen;
        }

        for tap in kernel.taps() {
            grid.add_error(x as isize + tap.dx, line + tap.dy, &error, tap.weight);
        }
    }

    indices
}
