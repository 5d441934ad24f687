use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snesify::services::fix_hirom_checksum;

#[derive(Parser)]
#[command(name = "fix-checksum")]
#[command(version)]
#[command(about = "Recompute the internal header checksum of a HiROM image")]
struct Cli {
    /// ROM image to read
    infile: PathBuf,

    /// Where to write the fixed image (may be the same file)
    outfile: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snesify=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let mut rom = std::fs::read(&cli.infile)
        .with_context(|| format!("Failed to read {}", cli.infile.display()))?;
    let checksum = fix_hirom_checksum(&mut rom)?;
    std::fs::write(&cli.outfile, &rom)
        .with_context(|| format!("Failed to write {}", cli.outfile.display()))?;

    tracing::info!(checksum = %format!("{checksum:04x}"), "Wrote {}", cli.outfile.display());
    Ok(())
}
