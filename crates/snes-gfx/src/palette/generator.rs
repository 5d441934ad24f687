//! One palette generator over both clustering strategies.

use super::error::PaletteError;
use super::kmeans::KMeans;
use super::median_cut::median_cut;
use super::palette::Palette;

/// Clustering strategy used to build palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuantizeMode {
    /// Exact, deterministic median cut. Ignores seed palettes.
    MedianCut,

    /// Iterative k-means clustering.
    #[default]
    KMeans,

    /// K-means with mini-batch updates; faster on large point sets.
    MiniBatchKMeans,
}

/// Produces fixed-size palettes from pixel point sets.
///
/// The generator always returns exactly `count` colors: degenerate point sets
/// are padded by repeating colors rather than failing.
///
/// # Example
///
/// ```
/// use snes_gfx::{PaletteGenerator, QuantizeMode};
///
/// let points = vec![0.5_f32; 3 * 64];
/// let generator = PaletteGenerator::new(QuantizeMode::MedianCut, 16);
/// let palette = generator.generate(&points, 3, None).unwrap();
/// assert_eq!(palette.len(), 16);
/// ```
#[derive(Debug, Clone)]
pub struct PaletteGenerator {
    mode: QuantizeMode,
    count: usize,
    median_cut_seed: bool,
    rng_seed: u64,
}

impl PaletteGenerator {
    pub fn new(mode: QuantizeMode, count: usize) -> Self {
        Self {
            mode,
            count,
            median_cut_seed: false,
            rng_seed: 0,
        }
    }

    /// Seed unseeded k-means runs with a median cut of the same points.
    #[inline]
    pub fn seed_with_median_cut(mut self, enabled: bool) -> Self {
        self.median_cut_seed = enabled;
        self
    }

    #[inline]
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    #[inline]
    pub fn mode(&self) -> QuantizeMode {
        self.mode
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Build a palette of exactly [`count()`](Self::count) colors.
    ///
    /// `seed` initializes k-means centroids directly (one run, no restarts).
    /// Median cut ignores it.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::NotPowerOfTwo`] for median cut with a bad count
    /// - [`PaletteError::NoPoints`] if `points` is empty
    /// - [`PaletteError::SeedChannels`] if the seed's channel count differs
    pub fn generate(
        &self,
        points: &[f32],
        channels: usize,
        seed: Option<&Palette>,
    ) -> Result<Palette, PaletteError> {
        let kmeans = match self.mode {
            QuantizeMode::MedianCut => return median_cut(points, channels, self.count),
            QuantizeMode::KMeans => KMeans::new(self.count),
            QuantizeMode::MiniBatchKMeans => KMeans::new(self.count).mini_batch(true),
        }
        .rng_seed(self.rng_seed);

        match seed {
            Some(seed) => kmeans.fit(points, channels, Some(seed)),
            None if self.median_cut_seed => {
                let seed = median_cut(points, channels, self.count)?;
                kmeans.fit(points, channels, Some(&seed))
            }
            None => kmeans.fit(points, channels, None),
        }
    }
}
