use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snesify::models::{AppConfig, ConfigOverrides, Format, Quantizer};
use snesify::services::{build_shared_palette, run_batch, write_shared_palette};
use snes_gfx::DitherKernel;

#[derive(Parser)]
#[command(name = "snesify")]
#[command(version)]
#[command(about = "Convert images to SNES tile (.chr) and palette (.pal) data")]
struct Cli {
    /// Images to convert
    files: Vec<PathBuf>,

    /// Log more (-v for progress, -vv for per-scanline detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Directory for output files (default: next to each input)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Gamma applied to decoded pixel values
    #[arg(long)]
    gamma_in: Option<f32>,

    /// Display gamma undone when writing palettes
    #[arg(long)]
    gamma_out: Option<f32>,

    /// Use mini-batch k-means
    #[arg(long)]
    mini_batch: bool,

    /// Build one palette from all inputs, write it here and skip per-image .pal files
    #[arg(long, value_name = "PATH")]
    shared_palette: Option<PathBuf>,

    /// Error diffusion kernel: fs, jjn, stucki, atkinson, burkes, sierra, sierra2, sierra-lite
    #[arg(long, value_name = "NAME")]
    dither: Option<DitherKernel>,

    /// Scan every line left to right
    #[arg(long)]
    no_boustrophedon: bool,

    /// Seed k-means with a median cut palette
    #[arg(long)]
    seed: bool,

    /// Lines above and below each scanline used for scan16 palettes
    #[arg(long)]
    window: Option<usize>,

    /// Palette clustering strategy
    #[arg(long, value_enum)]
    quantizer: Option<Quantizer>,

    /// Seed for the k-means random number generator
    #[arg(long, value_name = "N")]
    random_seed: Option<u64>,

    /// YAML file with default settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Also write a .preview.png showing the converted result
    #[arg(long)]
    preview: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            format: self.format,
            gamma_in: self.gamma_in,
            gamma_out: self.gamma_out,
            dither: self.dither,
            no_serpentine: self.no_boustrophedon,
            window: self.window,
            seed: self.seed,
            quantizer: self.quantizer,
            mini_batch: self.mini_batch,
            rng_seed: self.random_seed,
            out_dir: self.out_dir.clone(),
            preview: self.preview,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "snesify=warn,snes_gfx=warn",
        1 => "snesify=info,snes_gfx=info",
        _ => "snesify=debug,snes_gfx=debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    config.apply_cli(cli.overrides());
    config.validate()?;

    let shared = match &cli.shared_palette {
        Some(path) => {
            let palette = build_shared_palette(&cli.files, &config)
                .context("Failed to build shared palette")?;
            write_shared_palette(path, &palette, config.gamma_out)?;
            Some(palette)
        }
        None => None,
    };

    let summary = run_batch(&cli.files, &config, shared.as_ref());
    tracing::info!(
        converted = summary.converted,
        failed = summary.failed,
        "Batch complete"
    );

    if !summary.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
