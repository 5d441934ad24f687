//! Output file naming and writing.

use crate::error::ConvertFileError;
use std::path::{Path, PathBuf};

pub const CHR_EXTENSION: &str = "chr";
pub const PAL_EXTENSION: &str = "pal";
pub const PREVIEW_EXTENSION: &str = "preview.png";

/// Path of an output file for `input`.
///
/// The file is named after the input's stem with `extension` and placed in
/// `out_dir`, or next to the input when no output directory is given.
pub fn output_path(input: &Path, out_dir: Option<&Path>, extension: &str) -> PathBuf {
    let dir = match out_dir {
        Some(dir) => dir.to_path_buf(),
        None => match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        },
    };
    let mut name = input
        .file_stem()
        .unwrap_or(input.as_os_str())
        .to_os_string();
    name.push(".");
    name.push(extension);
    dir.join(name)
}

/// Write `bytes` to `path`, replacing any existing file.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<(), ConvertFileError> {
    std::fs::write(path, bytes).map_err(|source| ConvertFileError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Wrote output");
    Ok(())
}
