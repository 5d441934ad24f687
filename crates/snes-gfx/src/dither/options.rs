//! Dithering configuration.

use super::kernel::Kernel;

/// Options controlling how a scanline is quantized.
///
/// With no kernel every pixel simply maps to its nearest palette entry. With
/// a kernel, quantization error is diffused onto later pixels.
///
/// # Example
///
/// ```
/// use snes_gfx::dither::{DitherKernel, DitherOptions};
///
/// let options = DitherOptions::new()
///     .kernel(DitherKernel::Atkinson)
///     .serpentine(false);
/// assert!(options.kernel_ref().is_some());
/// assert!(!options.is_serpentine());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DitherOptions {
    kernel: Option<Kernel>,
    serpentine: bool,
}

impl Default for DitherOptions {
    fn default() -> Self {
        Self {
            kernel: None,
            serpentine: true,
        }
    }
}

impl DitherOptions {
    /// No diffusion, serpentine scanning enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Diffuse error with `kernel`.
    pub fn kernel(mut self, kernel: impl Into<Kernel>) -> Self {
        self.kernel = Some(kernel.into());
        self
    }

    /// Quantize each pixel independently.
    pub fn no_dither(mut self) -> Self {
        self.kernel = None;
        self
    }

    /// Scan odd scanlines right-to-left with a mirrored kernel (default: true).
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.serpentine = enabled;
        self
    }

    #[inline]
    pub fn kernel_ref(&self) -> Option<&Kernel> {
        self.kernel.as_ref()
    }

    #[inline]
    pub fn is_serpentine(&self) -> bool {
        self.serpentine
    }
}
