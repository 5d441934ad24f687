//! Scratch directories with generated input images.

use image::{GrayImage, Luma, Rgb, RgbImage};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding test inputs and outputs.
///
/// Removed when dropped.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Horizontal RGB gradient with a vertical green ramp.
    pub fn gradient_png(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let path = self.file(name);
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                (x * 255 / width.max(2).saturating_sub(1)).min(255) as u8,
                (y * 255 / height.max(2).saturating_sub(1)).min(255) as u8,
                64,
            ])
        })
        .save(&path)
        .expect("Failed to write fixture");
        path
    }

    /// Single-color RGB image.
    pub fn solid_png(&self, name: &str, width: u32, height: u32, rgb: [u8; 3]) -> PathBuf {
        let path = self.file(name);
        RgbImage::from_pixel(width, height, Rgb(rgb))
            .save(&path)
            .expect("Failed to write fixture");
        path
    }

    /// 8-bit grayscale image with columns alternating black and white.
    pub fn stripes_gray_png(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let path = self.file(name);
        GrayImage::from_fn(width, height, |x, _| Luma([if x % 2 == 0 { 0 } else { 255 }]))
            .save(&path)
            .expect("Failed to write fixture");
        path
    }

    /// A file that exists but is not an image.
    pub fn garbage(&self, name: &str) -> PathBuf {
        let path = self.file(name);
        std::fs::write(&path, b"not an image").expect("Failed to write fixture");
        path
    }

    pub fn read(&self, name: &str) -> Vec<u8> {
        std::fs::read(self.file(name)).unwrap_or_else(|e| panic!("Failed to read {name}: {e}"))
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}
