use std::path::PathBuf;

use snes_gfx::{ConvertError, PaletteError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Input gamma must be positive, got {0}")]
    InvalidGamma(f32),

    #[error("A shared palette cannot be used with the scan16 format")]
    SharedPaletteWithScan16,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Unusable image {path}: {source}")]
    Grid {
        path: PathBuf,
        #[source]
        source: ConvertError,
    },
}

#[derive(Debug, Error)]
pub enum ConvertFileError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Conversion of {path} failed: {source}")]
    Convert {
        path: PathBuf,
        #[source]
        source: ConvertError,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Preview error: {0}")]
    Preview(#[from] PreviewError),
}

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Unsupported dimensions: {width}x{height}")]
    UnsupportedDimensions { width: usize, height: usize },

    #[error(transparent)]
    Decode(#[from] ConvertError),
}

#[derive(Debug, Error)]
pub enum SharedPaletteError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("No input files to build a shared palette from")]
    NoInputs,

    #[error("Shared palette generation failed: {0}")]
    Palette(#[from] PaletteError),

    #[error("Shared palette encoding failed: {0}")]
    Encode(#[from] ConvertError),

    #[error("Failed to write shared palette {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ChecksumError {
    #[error("ROM image is {size} bytes, a HiROM header needs at least {min}")]
    TooSmall { size: usize, min: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_invalid_gamma() {
        let error = ConfigError::InvalidGamma(0.0);
        assert_eq!(error.to_string(), "Input gamma must be positive, got 0");
    }

    #[test]
    fn test_convert_file_error_write() {
        let error = ConvertFileError::Write {
            path: PathBuf::from("out/title.chr"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(error.to_string(), "Failed to write out/title.chr: denied");
    }

    #[test]
    fn test_preview_error_dimensions() {
        let error = PreviewError::UnsupportedDimensions {
            width: 0,
            height: 8,
        };
        assert_eq!(error.to_string(), "Unsupported dimensions: 0x8");
    }

    #[test]
    fn test_shared_palette_error_wraps_config() {
        let error: SharedPaletteError = ConfigError::SharedPaletteWithScan16.into();
        assert_eq!(
            error.to_string(),
            "A shared palette cannot be used with the scan16 format"
        );
    }

    #[test]
    fn test_checksum_error() {
        let error = ChecksumError::TooSmall {
            size: 1024,
            min: 0x10000,
        };
        assert_eq!(
            error.to_string(),
            "ROM image is 1024 bytes, a HiROM header needs at least 65536"
        );
    }
}
