//! Conversion configuration.

use crate::dither::DitherOptions;
use crate::encode::BitDepth;
use crate::palette::QuantizeMode;

/// Which pixels a generated palette covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaletteScope {
    /// One palette for the whole image, written once.
    #[default]
    Image,

    /// A fresh palette for every scanline, built from the lines within
    /// `window` of it (`line - window ..= line + window`, cropped to the
    /// image) and written once per line. Palette data is meant to be
    /// swapped in by HDMA during horizontal blanking.
    Scanline {
        /// Window radius in lines; 0 uses only the current line
        window: usize,
    },
}

/// Complete configuration of one conversion.
///
/// Passed by value into [`Converter::new`](crate::Converter::new); nothing
/// about a conversion is read from global state.
///
/// # Example
///
/// ```
/// use snes_gfx::dither::DitherKernel;
/// use snes_gfx::encode::BitDepth;
/// use snes_gfx::{ConvertOptions, PaletteScope, QuantizeMode};
///
/// let options = ConvertOptions::new()
///     .depth(BitDepth::Two)
///     .mode(QuantizeMode::MedianCut)
///     .kernel(DitherKernel::Atkinson);
/// assert_eq!(options.depth_value(), BitDepth::Two);
///
/// let scan16 = ConvertOptions::scan16().window(2);
/// assert_eq!(scan16.scope_value(), PaletteScope::Scanline { window: 2 });
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    depth: BitDepth,
    scope: PaletteScope,
    mode: QuantizeMode,
    seed: bool,
    dither: DitherOptions,
    gamma_out: f32,
    rng_seed: u64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            depth: BitDepth::Four,
            scope: PaletteScope::Image,
            mode: QuantizeMode::KMeans,
            seed: false,
            dither: DitherOptions::default(),
            gamma_out: 1.0,
            rng_seed: 0,
        }
    }
}

impl ConvertOptions {
    /// 4bpp, whole-image k-means palette, no dithering, linear output.
    pub fn new() -> Self {
        Self::default()
    }

    /// 4bpp with one 16-color palette per scanline.
    pub fn scan16() -> Self {
        Self::default().scope(PaletteScope::Scanline { window: 0 })
    }

    #[inline]
    pub fn depth(mut self, depth: BitDepth) -> Self {
        self.depth = depth;
        self
    }

    #[inline]
    pub fn scope(mut self, scope: PaletteScope) -> Self {
        self.scope = scope;
        self
    }

    /// Set the window radius. Only meaningful for per-scanline palettes;
    /// ignored otherwise.
    #[inline]
    pub fn window(mut self, radius: usize) -> Self {
        if let PaletteScope::Scanline { window } = &mut self.scope {
            *window = radius;
        }
        self
    }

    #[inline]
    pub fn mode(mut self, mode: QuantizeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Seed palette generation: whole-image k-means starts from a median cut,
    /// and per-scanline k-means starts from the whole-image palette.
    #[inline]
    pub fn seed(mut self, enabled: bool) -> Self {
        self.seed = enabled;
        self
    }

    #[inline]
    pub fn dither(mut self, dither: DitherOptions) -> Self {
        self.dither = dither;
        self
    }

    /// Shorthand for `dither(self.dither.kernel(kernel))`.
    #[inline]
    pub fn kernel(mut self, kernel: impl Into<crate::dither::Kernel>) -> Self {
        self.dither = self.dither.kernel(kernel);
        self
    }

    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.dither = self.dither.serpentine(enabled);
        self
    }

    /// Display gamma undone when palettes are encoded.
    #[inline]
    pub fn gamma_out(mut self, gamma: f32) -> Self {
        self.gamma_out = gamma;
        self
    }

    /// Seed for k-means++ initialization and mini-batch sampling.
    #[inline]
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    #[inline]
    pub fn depth_value(&self) -> BitDepth {
        self.depth
    }

    #[inline]
    pub fn scope_value(&self) -> PaletteScope {
        self.scope
    }

    #[inline]
    pub fn mode_value(&self) -> QuantizeMode {
        self.mode
    }

    #[inline]
    pub fn is_seeded(&self) -> bool {
        self.seed
    }

    #[inline]
    pub fn dither_options(&self) -> &DitherOptions {
        &self.dither
    }

    #[inline]
    pub fn gamma_out_value(&self) -> f32 {
        self.gamma_out
    }

    #[inline]
    pub fn rng_seed_value(&self) -> u64 {
        self.rng_seed
    }
}
