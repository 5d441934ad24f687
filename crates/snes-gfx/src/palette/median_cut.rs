//! Median cut palette generation.
//!
//! Heckbert-style median cut: the point set is split in two along the channel
//! with the greatest range, `log2(count)` times, and every final bucket
//! collapses to the mean of its points.

use super::error::PaletteError;
use super::palette::Palette;

/// Generate a palette of exactly `count` colors by median cut.
///
/// `points` is flat color storage with `channels` components per point.
/// The result is deterministic for a given input order: splits use a stable
/// sort, and ties between channel ranges go to the lowest channel.
///
/// A bucket with fewer than two points cannot be split further; both halves
/// then inherit the same points, so the bucket's color is repeated. This is
/// how a point set with fewer distinct colors than `count` (down to a single
/// repeated color) still produces a full palette.
///
/// # Errors
///
/// - [`PaletteError::NotPowerOfTwo`] if `count` is not a power of two
/// - [`PaletteError::NoPoints`] if `points` holds no complete point
///
/// # Example
///
/// ```
/// use snes_gfx::palette::median_cut;
///
/// let points = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
/// let palette = median_cut(&points, 3, 4).unwrap();
/// assert_eq!(palette.len(), 4);
/// ```
pub fn median_cut(points: &[f32], channels: usize, count: usize) -> Result<Palette, PaletteError> {
    if !count.is_power_of_two() {
        return Err(PaletteError::NotPowerOfTwo(count));
    }
    if channels == 0 || points.len() < channels {
        return Err(PaletteError::NoPoints);
    }

    let mut pixels: Vec<&[f32]> = points.chunks_exact(channels).collect();
    let mut colors = Vec::with_capacity(count * channels);
    cut(&mut pixels, channels, count.trailing_zeros(), &mut colors);

    Palette::new(colors, channels)
}

fn cut(pixels: &mut [&[f32]], channels: usize, depth: u32, out: &mut Vec<f32>) {
    if depth == 0 {
        push_mean(pixels, channels, out);
        return;
    }

    if pixels.len() < 2 {
        cut(pixels, channels, depth - 1, out);
        cut(pixels, channels, depth - 1, out);
        return;
    }

    let channel = widest_channel(pixels, channels);
    // sort_by is stable
    pixels.sort_by(|a, b| a[channel].total_cmp(&b[channel]));

    let median = pixels.len() / 2;
    let (lesser, greater) = pixels.split_at_mut(median);
    cut(lesser, channels, depth - 1, out);
    cut(greater, channels, depth - 1, out);
}

/// Channel with the greatest `max - min` over `pixels`; lowest index on ties.
fn widest_channel(pixels: &[&[f32]], channels: usize) -> usize {
    let mut best_channel = 0;
    let mut best_range = f32::NEG_INFINITY;

    for c in 0..channels {
        let (min, max) = pixels
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p[c]), hi.max(p[c]))
            });
        let range = max - min;
        if range > best_range {
            best_range = range;
            best_channel = c;
        }
    }

    best_channel
}

fn push_mean(pixels: &[&[f32]], channels: usize, out: &mut Vec<f32>) {
    let n = pixels.len() as f64;
    for c in 0..channels {
        let sum: f64 = pixels.iter().map(|p| p[c] as f64).sum();
        out.push((sum / n) as f32);
    }
}
