//! Fixed-size ordered palette and nearest-color lookup.

use super::error::PaletteError;

/// An ordered set of colors.
///
/// The position of a color is the index written to the planar output, so the
/// order must stay stable for one encode pass. A palette is immutable once
/// built; the operations that change its size or range return a new one.
///
/// Colors are stored flat (`len * channels` components) so palettes can be
/// built directly from cluster centroids of any channel count.
///
/// # Example
///
/// ```
/// use snes_gfx::Palette;
///
/// let palette = Palette::from_colors(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);
/// assert_eq!(palette.len(), 2);
/// assert_eq!(palette.find_nearest(&[0.8, 0.9, 0.7]), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<f32>,
    channels: usize,
}

impl Palette {
    /// Create a palette from flat color storage.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::Empty`] if there are no colors
    /// - [`PaletteError::Ragged`] if `colors.len()` is not a multiple of `channels`
    pub fn new(colors: Vec<f32>, channels: usize) -> Result<Self, PaletteError> {
        if colors.is_empty() || channels == 0 {
            return Err(PaletteError::Empty);
        }
        if colors.len() % channels != 0 {
            return Err(PaletteError::Ragged {
                len: colors.len(),
                channels,
            });
        }
        Ok(Self { colors, channels })
    }

    /// Create an RGB palette from color triples.
    ///
    /// # Panics
    ///
    /// Panics if `colors` is empty.
    pub fn from_colors(colors: &[[f32; 3]]) -> Self {
        assert!(!colors.is_empty(), "palette cannot be empty");
        Self {
            colors: colors.iter().flatten().copied().collect(),
            channels: 3,
        }
    }

    /// Number of colors.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len() / self.channels
    }

    /// Always `false`: empty palettes are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Components of the color at `idx`.
    #[inline]
    pub fn color(&self, idx: usize) -> &[f32] {
        &self.colors[idx * self.channels..(idx + 1) * self.channels]
    }

    /// Iterate over colors in index order.
    pub fn iter(&self) -> impl Iterator<Item = &[f32]> {
        self.colors.chunks_exact(self.channels)
    }

    /// Flat component storage.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.colors
    }

    /// Index of the palette entry closest to `color`.
    ///
    /// Distance is Euclidean (compared squared). When several entries are
    /// equally close the lowest index wins, so the result is deterministic
    /// even for palettes that contain duplicate entries.
    #[inline]
    pub fn find_nearest(&self, color: &[f32]) -> usize {
        let mut best_idx = 0;
        let mut best_dist = f32::INFINITY;

        for (i, entry) in self.iter().enumerate() {
            let dist = distance_squared(color, entry);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }

        best_idx
    }

    /// Resize to exactly `count` entries by cyclic repetition.
    ///
    /// Entry `i` of the result is entry `i % len` of `self`; shrinking keeps
    /// the first `count` entries.
    pub fn resized(&self, count: usize) -> Self {
        let len = self.len();
        let mut colors = Vec::with_capacity(count * self.channels);
        for i in 0..count {
            colors.extend_from_slice(self.color(i % len));
        }
        Self {
            colors,
            channels: self.channels,
        }
    }

    /// Copy with every component clamped into `[0, 1]`.
    pub fn clamped(&self) -> Self {
        Self {
            colors: self.colors.iter().map(|v| v.clamp(0.0, 1.0)).collect(),
            channels: self.channels,
        }
    }
}

/// Squared Euclidean distance between two colors.
#[inline]
pub(crate) fn distance_squared(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
