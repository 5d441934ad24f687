//! Error diffusion kernel definitions.
//!
//! A kernel is written as a weight matrix: the first row is the current
//! scanline, each following row is one scanline further down, and the center
//! column (`width / 2`) is the pixel being quantized. Only cells that point at
//! not-yet-visited pixels carry weight.

use std::fmt;
use std::str::FromStr;

/// One weighted neighbor of an error diffusion kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    /// Horizontal offset (positive = right, negated for right-to-left scans)
    pub dx: isize,
    /// Vertical offset (0 = current scanline)
    pub dy: usize,
    /// Fraction of the quantization error sent to this neighbor
    pub weight: f32,
}

/// An error diffusion kernel.
///
/// Weights conventionally sum to 1 (100% propagation) but this is not
/// enforced: Atkinson deliberately propagates 75%, and an all-zero kernel is
/// valid and behaves like no dithering at all.
///
/// # Example
///
/// ```
/// use snes_gfx::dither::Kernel;
///
/// // Floyd-Steinberg
/// let kernel = Kernel::from_matrix(&[[0.0, 0.0, 7.0], [3.0, 5.0, 1.0]], 16.0);
/// assert_eq!(kernel.taps().len(), 4);
/// assert_eq!(kernel.max_dy(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    taps: Vec<Tap>,
    max_dy: usize,
}

impl Kernel {
    /// Build a kernel from a weight matrix, dividing every cell by `divisor`.
    ///
    /// Row 0 is the current scanline and column `width / 2` the current
    /// pixel. Zero cells are dropped.
    pub fn from_matrix<const W: usize>(rows: &[[f32; W]], divisor: f32) -> Self {
        let center = (W / 2) as isize;
        let mut taps = Vec::new();
        let mut max_dy = 0;

        for (dy, row) in rows.iter().enumerate() {
            for (col, &weight) in row.iter().enumerate() {
                if weight != 0.0 {
                    taps.push(Tap {
                        dx: col as isize - center,
                        dy,
                        weight: weight / divisor,
                    });
                    max_dy = max_dy.max(dy);
                }
            }
        }

        Self { taps, max_dy }
    }

    /// Nonzero taps in matrix order.
    #[inline]
    pub fn taps(&self) -> &[Tap] {
        &self.taps
    }

    /// How many scanlines below the current one the kernel reaches.
    #[inline]
    pub fn max_dy(&self) -> usize {
        self.max_dy
    }

    /// Sum of all weights (1.0 for full propagation).
    pub fn total_weight(&self) -> f32 {
        self.taps.iter().map(|t| t.weight).sum()
    }

    /// True if the kernel diffuses nothing.
    pub fn is_zero(&self) -> bool {
        self.taps.is_empty()
    }

    /// Horizontally mirrored copy, used for right-to-left scanlines.
    pub fn mirrored(&self) -> Self {
        Self {
            taps: self
                .taps
                .iter()
                .map(|t| Tap { dx: -t.dx, ..*t })
                .collect(),
            max_dy: self.max_dy,
        }
    }
}

/// The named kernels selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DitherKernel {
    /// Floyd-Steinberg, 4 neighbors, /16.
    ///
    /// ```text
    ///        X   7
    ///    3   5   1
    /// ```
    FloydSteinberg,

    /// Jarvis-Judice-Ninke, 12 neighbors over 3 rows, /48.
    ///
    /// ```text
    ///            X   7   5
    ///    3   5   7   5   3
    ///    1   3   5   3   1
    /// ```
    JarvisJudiceNinke,

    /// Stucki, JJN geometry with sharper center weights, /42.
    ///
    /// ```text
    ///            X   8   4
    ///    2   4   8   4   2
    ///    1   2   4   2   1
    /// ```
    Stucki,

    /// Atkinson, 6 neighbors, only 75% of the error propagates.
    ///
    /// ```text
    ///        X   1   1
    ///    1   1   1
    ///        1
    /// ```
    Atkinson,

    /// Burkes, two-row Stucki, /32.
    Burkes,

    /// Sierra (three-row), /32.
    Sierra,

    /// Sierra two-row, /16.
    SierraTwoRow,

    /// Sierra Lite, 3 neighbors, /4.
    SierraLite,
}

impl DitherKernel {
    pub const ALL: [DitherKernel; 8] = [
        DitherKernel::FloydSteinberg,
        DitherKernel::JarvisJudiceNinke,
        DitherKernel::Stucki,
        DitherKernel::Atkinson,
        DitherKernel::Burkes,
        DitherKernel::Sierra,
        DitherKernel::SierraTwoRow,
        DitherKernel::SierraLite,
    ];

    /// Short configuration name (`fs`, `jjn`, `stucki`, ...).
    pub fn name(self) -> &'static str {
        match self {
            DitherKernel::FloydSteinberg => "fs",
            DitherKernel::JarvisJudiceNinke => "jjn",
            DitherKernel::Stucki => "stucki",
            DitherKernel::Atkinson => "atkinson",
            DitherKernel::Burkes => "burkes",
            DitherKernel::Sierra => "sierra",
            DitherKernel::SierraTwoRow => "sierra2",
            DitherKernel::SierraLite => "sierra-lite",
        }
    }

    /// The weight matrix of this kernel.
    pub fn kernel(self) -> Kernel {
        match self {
            DitherKernel::FloydSteinberg => {
                Kernel::from_matrix(&[[0.0, 0.0, 7.0], [3.0, 5.0, 1.0]], 16.0)
            }
            DitherKernel::JarvisJudiceNinke => Kernel::from_matrix(
                &[
                    [0.0, 0.0, 0.0, 7.0, 5.0],
                    [3.0, 5.0, 7.0, 5.0, 3.0],
                    [1.0, 3.0, 5.0, 3.0, 1.0],
                ],
                48.0,
            ),
            DitherKernel::Stucki => Kernel::from_matrix(
                &[
                    [0.0, 0.0, 0.0, 8.0, 4.0],
                    [2.0, 4.0, 8.0, 4.0, 2.0],
                    [1.0, 2.0, 4.0, 2.0, 1.0],
                ],
                42.0,
            ),
            DitherKernel::Atkinson => Kernel::from_matrix(
                &[
                    [0.0, 0.0, 0.0, 1.0, 1.0],
                    [0.0, 1.0, 1.0, 1.0, 0.0],
                    [0.0, 0.0, 1.0, 0.0, 0.0],
                ],
                8.0,
            ),
            DitherKernel::Burkes => Kernel::from_matrix(
                &[[0.0, 0.0, 0.0, 8.0, 4.0], [2.0, 4.0, 8.0, 4.0, 2.0]],
                32.0,
            ),
            DitherKernel::Sierra => Kernel::from_matrix(
                &[
                    [0.0, 0.0, 0.0, 5.0, 3.0],
                    [2.0, 4.0, 5.0, 4.0, 2.0],
                    [0.0, 2.0, 3.0, 2.0, 0.0],
                ],
                32.0,
            ),
            DitherKernel::SierraTwoRow => Kernel::from_matrix(
                &[[0.0, 0.0, 0.0, 4.0, 3.0], [1.0, 2.0, 3.0, 2.0, 1.0]],
                16.0,
            ),
            DitherKernel::SierraLite => {
                Kernel::from_matrix(&[[0.0, 0.0, 2.0], [1.0, 1.0, 0.0]], 4.0)
            }
        }
    }
}

impl From<DitherKernel> for Kernel {
    fn from(kernel: DitherKernel) -> Self {
        kernel.kernel()
    }
}

impl fmt::Display for DitherKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a kernel name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dither kernel '{0}' (expected one of: fs, jjn, stucki, atkinson, burkes, sierra, sierra2, sierra-lite)")]
pub struct UnknownKernel(pub String);

impl FromStr for DitherKernel {
    type Err = UnknownKernel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DitherKernel::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownKernel(s.to_string()))
    }
}
