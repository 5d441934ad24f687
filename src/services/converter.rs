//! Per-file conversion and batch processing.

use crate::error::{ConvertFileError, PreviewError};
use crate::models::AppConfig;
use crate::rendering::PreviewRenderer;
use crate::services::image_loader::load_grid;
use crate::services::output::{
    output_path, write_output, CHR_EXTENSION, PAL_EXTENSION, PREVIEW_EXTENSION,
};
use snes_gfx::encode::planar::TILE_SIZE;
use snes_gfx::{ConvertWarning, Converter, Palette};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// What a successful conversion wrote.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub input: PathBuf,
    pub chr_path: PathBuf,
    /// `None` when a shared palette was used
    pub pal_path: Option<PathBuf>,
    pub preview_path: Option<PathBuf>,
    /// Total bytes of tile and palette data
    pub bytes: usize,
    pub warnings: Vec<ConvertWarning>,
    pub elapsed: Duration,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub converted: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Convert one image file and write its outputs.
///
/// Writes `<stem>.chr`, plus `<stem>.pal` unless `shared` is given, plus
/// `<stem>.preview.png` when previews are enabled.
pub fn convert_file(
    path: &Path,
    config: &AppConfig,
    shared: Option<&Palette>,
) -> Result<FileReport, ConvertFileError> {
    let start = Instant::now();

    let mut grid = load_grid(path, config.gamma_in)?;
    let (width, height) = (grid.width(), grid.height());

    let options = config.convert_options();
    let depth = options.depth_value();
    let gamma_out = options.gamma_out_value();
    let mut converter = Converter::new(options);
    if let Some(palette) = shared {
        converter = converter.shared_palette(palette.clone());
    }

    let image = converter
        .convert(&mut grid)
        .map_err(|source| ConvertFileError::Convert {
            path: path.to_path_buf(),
            source,
        })?;
    for warning in image.warnings() {
        tracing::warn!(path = %path.display(), "{}", warning);
    }

    let out_dir = config.out_dir.as_deref();
    let preview_path = if config.preview {
        let used_width = width / TILE_SIZE * TILE_SIZE;
        let used_height = height / TILE_SIZE * TILE_SIZE;
        let preview_path = output_path(path, out_dir, PREVIEW_EXTENSION);
        let renderer = PreviewRenderer::new(depth, gamma_out);
        match renderer.render_to_png(&image, used_width, used_height) {
            Ok(png) => {
                write_output(&preview_path, &png)?;
                Some(preview_path)
            }
            // An image smaller than one tile has nothing to show
            Err(PreviewError::UnsupportedDimensions { .. }) => {
                tracing::warn!(path = %path.display(), "No complete tiles, preview skipped");
                None
            }
            Err(e) => return Err(e.into()),
        }
    } else {
        None
    };

    let warnings = image.warnings().to_vec();
    let (chr, pal) = image.into_streams();

    let chr_path = output_path(path, out_dir, CHR_EXTENSION);
    write_output(&chr_path, &chr)?;
    let mut bytes = chr.len();

    let pal_path = match pal {
        Some(pal) => {
            let pal_path = output_path(path, out_dir, PAL_EXTENSION);
            write_output(&pal_path, &pal)?;
            bytes += pal.len();
            Some(pal_path)
        }
        None => None,
    };

    let elapsed = start.elapsed();
    tracing::info!(
        path = %path.display(),
        width,
        height,
        bytes,
        secs = %format!("{:.2}", elapsed.as_secs_f64()),
        "Converted"
    );

    Ok(FileReport {
        input: path.to_path_buf(),
        chr_path,
        pal_path,
        preview_path,
        bytes,
        warnings,
        elapsed,
    })
}

/// Convert every file in order.
///
/// A failing file is logged and skipped; the rest of the batch still runs.
pub fn run_batch(
    files: &[PathBuf],
    config: &AppConfig,
    shared: Option<&Palette>,
) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for path in files {
        match convert_file(path, config, shared) {
            Ok(_) => summary.converted += 1,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Conversion failed");
                summary.failed += 1;
            }
        }
    }
    summary
}
