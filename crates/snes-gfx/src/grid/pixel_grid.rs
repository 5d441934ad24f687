//! Owned, mutable float pixel buffer.
//!
//! [`PixelGrid`] is the single piece of mutable state in a conversion. Error
//! diffusion writes straight into it, so any later read of a pixel (by the
//! quantizer or by a palette window) observes the error that earlier pixels
//! pushed into it.

use std::ops::Range;

use crate::api::ConvertError;

/// A `height x width x channels` grid of floating point channel values.
///
/// Values are nominally in `[0, 1]` after gamma correction, but may leave that
/// range once quantization error has been diffused into them. Storage is
/// row-major with channels interleaved, so a run of whole scanlines is one
/// contiguous slice.
///
/// # Example
///
/// ```
/// use snes_gfx::PixelGrid;
///
/// let grid = PixelGrid::from_fn(8, 8, 3, |x, _y, _c| x as f32 / 7.0);
/// assert_eq!(grid.pixel(7, 0), &[1.0, 1.0, 1.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid {
    data: Vec<f32>,
    width: usize,
    height: usize,
    channels: usize,
}

impl PixelGrid {
    /// Wrap an existing row-major buffer.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::EmptyImage`] if any dimension is zero
    /// - [`ConvertError::BufferSize`] if `data.len() != width * height * channels`
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<f32>,
    ) -> Result<Self, ConvertError> {
        if width == 0 || height == 0 || channels == 0 {
            return Err(ConvertError::EmptyImage {
                width,
                height,
                channels,
            });
        }
        let expected = width * height * channels;
        if data.len() != expected {
            return Err(ConvertError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Build a grid by evaluating `f(x, y, channel)` for every component.
    ///
    /// Dimensions are not checked here; a zero-sized grid is rejected when it
    /// is converted.
    pub fn from_fn(
        width: usize,
        height: usize,
        channels: usize,
        mut f: impl FnMut(usize, usize, usize) -> f32,
    ) -> Self {
        let mut data = Vec::with_capacity(width * height * channels);
        for y in 0..height {
            for x in 0..width {
                for c in 0..channels {
                    data.push(f(x, y, c));
                }
            }
        }
        Self {
            data,
            width,
            height,
            channels,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// The whole buffer, row-major.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * self.channels
    }

    /// Channel values of one pixel.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[f32] {
        let start = self.offset(x, y);
        &self.data[start..start + self.channels]
    }

    #[inline]
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [f32] {
        let start = self.offset(x, y);
        &mut self.data[start..start + self.channels]
    }

    /// Contiguous view over the scanlines in `lines`.
    ///
    /// The range is clamped to the grid height.
    pub fn rows(&self, lines: Range<usize>) -> &[f32] {
        let end = lines.end.min(self.height);
        let start = lines.start.min(end);
        &self.data[self.offset(0, start)..self.offset(0, end)]
    }

    /// Scanlines `line - radius ..= line + radius`, clamped to the image.
    ///
    /// This is the point set for windowed palette generation. A radius of 0
    /// yields the single scanline.
    pub fn window(&self, line: usize, radius: usize) -> &[f32] {
        let first = line.saturating_sub(radius);
        let end = line.saturating_add(radius).saturating_add(1);
        self.rows(first..end)
    }

    /// Clamp every channel of a pixel into `[0, 1]` in place.
    #[inline]
    pub fn clamp_pixel(&mut self, x: usize, y: usize) {
        for v in self.pixel_mut(x, y) {
            *v = v.clamp(0.0, 1.0);
        }
    }

    /// Add `error * weight` to the pixel at `(x, y)`.
    ///
    /// Coordinates outside the grid are silently ignored: kernel taps that
    /// fall off an edge are cropped, never wrapped.
    #[inline]
    pub fn add_error(&mut self, x: isize, y: usize, error: &[f32], weight: f32) {
        if x < 0 || x as usize >= self.width || y >= self.height {
            return;
        }
        for (v, e) in self.pixel_mut(x as usize, y).iter_mut().zip(error) {
            *v += e * weight;
        }
    }
}
