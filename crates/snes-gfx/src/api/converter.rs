//! Converter -- the pipeline entry point.
//!
//! [`Converter`] runs palette generation, dithering and both encoders over a
//! [`PixelGrid`] in the only order that gives correct results: top to bottom,
//! one 8-line tile row at a time, each scanline fully dithered before the
//! next scanline's palette is computed.

use std::fmt;

use tracing::{debug, trace, warn};

use super::error::ConvertError;
use super::options::{ConvertOptions, PaletteScope};
use crate::dither::dither_line;
use crate::encode::planar::{self, TILE_SIZE};
use crate::encode::{cgram, BitDepth};
use crate::grid::PixelGrid;
use crate::palette::{Palette, PaletteGenerator};

/// Non-fatal observations made during a conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertWarning {
    /// The image is not a whole number of tiles; trailing columns and rows
    /// were dropped.
    Truncated {
        width: usize,
        height: usize,
        used_width: usize,
        used_height: usize,
    },
}

impl fmt::Display for ConvertWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertWarning::Truncated {
                width,
                height,
                used_width,
                used_height,
            } => write!(
                f,
                "{width}x{height} is not a multiple of {TILE_SIZE}, only {used_width}x{used_height} encoded"
            ),
        }
    }
}

/// Output of one conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    chr: Vec<u8>,
    palette: Option<Vec<u8>>,
    palettes: Vec<Palette>,
    warnings: Vec<ConvertWarning>,
}

impl EncodedImage {
    /// The planar pixel stream.
    #[inline]
    pub fn chr(&self) -> &[u8] {
        &self.chr
    }

    /// The palette stream, or `None` when a shared palette was used.
    #[inline]
    pub fn palette(&self) -> Option<&[u8]> {
        self.palette.as_deref()
    }

    /// The palettes the indices refer to: one for whole-image and shared
    /// palettes, one per encoded scanline otherwise.
    #[inline]
    pub fn palettes(&self) -> &[Palette] {
        &self.palettes
    }

    #[inline]
    pub fn warnings(&self) -> &[ConvertWarning] {
        &self.warnings
    }

    /// Consume into `(chr, palette)` byte streams.
    pub fn into_streams(self) -> (Vec<u8>, Option<Vec<u8>>) {
        (self.chr, self.palette)
    }
}

/// Where each scanline's palette comes from.
enum LinePalettes {
    /// One palette for every line.
    Fixed(Palette),
    /// Generated per line, optionally seeded.
    PerLine {
        window: usize,
        seed: Option<Palette>,
    },
}

/// Converts pixel grids into console graphics data.
///
/// The converter holds configuration only and is reusable across images;
/// [`convert()`](Self::convert) takes `&self`.
///
/// # Example
///
/// ```
/// use snes_gfx::{ConvertOptions, Converter, PixelGrid, QuantizeMode};
///
/// let mut grid = PixelGrid::from_fn(16, 8, 3, |x, _, c| if c == 0 { x as f32 / 15.0 } else { 0.5 });
/// let converter = Converter::new(ConvertOptions::new().mode(QuantizeMode::MedianCut));
///
/// let image = converter.convert(&mut grid).unwrap();
/// assert_eq!(image.chr().len(), 2 * 32);
/// assert_eq!(image.palette().map(<[u8]>::len), Some(32));
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    options: ConvertOptions,
    shared: Option<Palette>,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            shared: None,
        }
    }

    /// Quantize against a fixed palette instead of generating one.
    ///
    /// No palette stream is produced. The palette must have exactly
    /// `2^bpp` RGB entries, and cannot be combined with
    /// [`PaletteScope::Scanline`].
    pub fn shared_palette(mut self, palette: Palette) -> Self {
        self.shared = Some(palette);
        self
    }

    #[inline]
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert `grid`, dithering it in place.
    ///
    /// After the call `grid` holds the clamped, error-diffused values of every
    /// processed scanline.
    ///
    /// # Errors
    ///
    /// Configuration problems are reported before any pixel is touched:
    ///
    /// - [`ConvertError::EmptyImage`] if the grid has no pixels
    /// - [`ConvertError::ChannelCount`] if the grid is not RGB
    /// - [`ConvertError::InvalidGamma`] for a non-positive output gamma
    /// - [`ConvertError::SharedPaletteScope`] for a shared palette with
    ///   per-scanline scope
    /// - [`ConvertError::SharedPaletteSize`] if the shared palette does not
    ///   have exactly `2^bpp` colors
    pub fn convert(&self, grid: &mut PixelGrid) -> Result<EncodedImage, ConvertError> {
        self.validate(grid)?;

        let options = &self.options;
        let depth = options.depth_value();
        let (width, height) = (grid.width(), grid.height());
        let used_width = width / TILE_SIZE * TILE_SIZE;
        let used_height = height / TILE_SIZE * TILE_SIZE;

        let mut warnings = Vec::new();
        if used_width != width || used_height != height {
            warn!(
                width,
                height, used_width, used_height, "image is not tile aligned, truncating"
            );
            warnings.push(ConvertWarning::Truncated {
                width,
                height,
                used_width,
                used_height,
            });
        }

        let generator = PaletteGenerator::new(options.mode_value(), depth.colors())
            .seed_with_median_cut(options.is_seeded())
            .rng_seed(options.rng_seed_value());

        let gamma_out = options.gamma_out_value();
        let mut pal = Vec::new();
        let lines = self.line_palettes(grid, &generator)?;
        let emit_palette_stream = self.shared.is_none();
        if let LinePalettes::Fixed(palette) = &lines {
            if emit_palette_stream {
                cgram::encode_palette(palette, gamma_out, &mut pal)?;
            }
        }

        let mut chr = Vec::with_capacity(planar::chr_size(width, height, depth));
        let mut palettes = Vec::new();
        let mut rows: Vec<Vec<u8>> = Vec::with_capacity(TILE_SIZE);

        for block in 0..used_height / TILE_SIZE {
            rows.clear();
            for line in block * TILE_SIZE..(block + 1) * TILE_SIZE {
                let indices = match &lines {
                    LinePalettes::Fixed(palette) => {
                        dither_line(grid, line, palette, options.dither_options())
                    }
                    LinePalettes::PerLine { window, seed } => {
                        // The window reads lines already dithered above this one
                        let palette = generator.generate(
                            grid.window(line, *window),
                            grid.channels(),
                            seed.as_ref(),
                        )?;
                        trace!(line, "generated scanline palette");
                        cgram::encode_palette(&palette, gamma_out, &mut pal)?;
                        let indices = dither_line(grid, line, &palette, options.dither_options());
                        palettes.push(palette);
                        indices
                    }
                };
                rows.push(indices);
            }
            planar::encode_tile_row(&rows, depth, &mut chr);
        }

        if let LinePalettes::Fixed(palette) = lines {
            palettes.push(palette);
        }

        debug!(
            width,
            height,
            %depth,
            chr_bytes = chr.len(),
            pal_bytes = pal.len(),
            "converted image"
        );

        Ok(EncodedImage {
            chr,
            palette: emit_palette_stream.then_some(pal),
            palettes,
            warnings,
        })
    }

    fn validate(&self, grid: &PixelGrid) -> Result<(), ConvertError> {
        if grid.width() == 0 || grid.height() == 0 {
            return Err(ConvertError::EmptyImage {
                width: grid.width(),
                height: grid.height(),
                channels: grid.channels(),
            });
        }
        if grid.channels() != 3 {
            return Err(ConvertError::ChannelCount {
                expected: 3,
                actual: grid.channels(),
            });
        }

        let gamma = self.options.gamma_out_value();
        if !(gamma.is_finite() && gamma > 0.0) {
            return Err(ConvertError::InvalidGamma(gamma));
        }

        if let Some(shared) = &self.shared {
            if matches!(self.options.scope_value(), PaletteScope::Scanline { .. }) {
                return Err(ConvertError::SharedPaletteScope);
            }
            let expected = self.options.depth_value().colors();
            if shared.len() != expected {
                return Err(ConvertError::SharedPaletteSize {
                    expected,
                    actual: shared.len(),
                });
            }
            if shared.channels() != grid.channels() {
                return Err(ConvertError::ChannelCount {
                    expected: grid.channels(),
                    actual: shared.channels(),
                });
            }
        }

        Ok(())
    }

    /// Decide the palette source, generating the whole-image palette when
    /// one is needed.
    fn line_palettes(
        &self,
        grid: &PixelGrid,
        generator: &PaletteGenerator,
    ) -> Result<LinePalettes, ConvertError> {
        let whole_image = || -> Result<Palette, ConvertError> {
            let palette = generator.generate(grid.as_slice(), grid.channels(), None)?;
            debug!(
                colors = palette.len(),
                mode = ?generator.mode(),
                "generated whole-image palette"
            );
            Ok(palette)
        };

        match (self.options.scope_value(), &self.shared) {
            (PaletteScope::Image, Some(shared)) => Ok(LinePalettes::Fixed(shared.clone())),
            (PaletteScope::Image, None) => Ok(LinePalettes::Fixed(whole_image()?)),
            (PaletteScope::Scanline { .. }, Some(_)) => Err(ConvertError::SharedPaletteScope),
            (PaletteScope::Scanline { window }, None) => Ok(LinePalettes::PerLine {
                window,
                seed: if self.options.is_seeded() {
                    Some(whole_image()?)
                } else {
                    None
                },
            }),
        }
    }
}

/// Bytes of palette stream produced for a `height`-line image.
pub fn palette_stream_size(height: usize, depth: BitDepth, scope: PaletteScope) -> usize {
    let palette_bytes = depth.colors() * 2;
    match scope {
        PaletteScope::Image => palette_bytes,
        PaletteScope::Scanline { .. } => height / TILE_SIZE * TILE_SIZE * palette_bytes,
    }
}
