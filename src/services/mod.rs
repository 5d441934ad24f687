pub mod checksum;
pub mod converter;
pub mod image_loader;
pub mod output;
pub mod shared_palette;

pub use checksum::fix_hirom_checksum;
pub use converter::{convert_file, run_batch, BatchSummary, FileReport};
pub use image_loader::load_grid;
pub use output::output_path;
pub use shared_palette::{build_shared_palette, write_shared_palette};
