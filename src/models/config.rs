use crate::error::ConfigError;
use serde::{Deserialize, Deserializer};
use snes_gfx::{
    BitDepth, ConvertOptions, DitherKernel, DitherOptions, PaletteScope, QuantizeMode,
};
use std::path::{Path, PathBuf};

/// Output format: bit depth plus palette layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
pub enum Format {
    /// 4 colors, one palette per image
    #[serde(rename = "2bit")]
    #[value(name = "2bit")]
    TwoBit,

    /// 16 colors, one palette per image
    #[default]
    #[serde(rename = "4bit")]
    #[value(name = "4bit")]
    FourBit,

    /// 256 colors, one palette per image
    #[serde(rename = "8bit")]
    #[value(name = "8bit")]
    EightBit,

    /// 16 colors, one palette per scanline
    #[serde(rename = "scan16")]
    #[value(name = "scan16")]
    Scan16,
}

impl Format {
    pub fn depth(self) -> BitDepth {
        match self {
            Format::TwoBit => BitDepth::Two,
            Format::FourBit | Format::Scan16 => BitDepth::Four,
            Format::EightBit => BitDepth::Eight,
        }
    }

    pub fn scope(self, window: usize) -> PaletteScope {
        match self {
            Format::Scan16 => PaletteScope::Scanline { window },
            _ => PaletteScope::Image,
        }
    }
}

/// Palette clustering strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
pub enum Quantizer {
    #[default]
    #[serde(rename = "kmeans")]
    #[value(name = "kmeans")]
    KMeans,

    #[serde(rename = "median-cut")]
    #[value(name = "median-cut")]
    MedianCut,
}

/// Conversion settings loaded from a YAML file.
///
/// Every field is optional; missing fields take the same defaults as the
/// command line.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub format: Format,

    /// Exponent applied to decoded pixel values
    pub gamma_in: f32,

    /// Display gamma undone when palettes are written
    pub gamma_out: f32,

    /// Error diffusion kernel name, or none
    #[serde(deserialize_with = "deserialize_kernel")]
    pub dither: Option<DitherKernel>,

    /// Alternate scan direction on odd lines
    pub serpentine: bool,

    /// Scanline window radius for scan16
    pub window: usize,

    /// Seed k-means from median cut (and scan16 lines from the image palette)
    pub seed: bool,

    pub quantizer: Quantizer,

    pub mini_batch: bool,

    pub rng_seed: u64,

    pub out_dir: Option<PathBuf>,

    /// Also write a `.png` showing the converted result
    pub preview: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            format: Format::FourBit,
            gamma_in: 1.0,
            gamma_out: 1.0,
            dither: None,
            serpentine: true,
            window: 0,
            seed: false,
            quantizer: Quantizer::KMeans,
            mini_batch: false,
            rng_seed: 0,
            out_dir: None,
            preview: false,
        }
    }
}

fn deserialize_kernel<'de, D>(deserializer: D) -> Result<Option<DitherKernel>, D::Error>
where
    D: Deserializer<'de>,
{
    let name: Option<String> = Option::deserialize(deserializer)?;
    match name {
        None => Ok(None),
        Some(name) if name.eq_ignore_ascii_case("none") => Ok(None),
        Some(name) => name.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Command-line values that take precedence over the config file.
///
/// `None` and `false` leave the file value alone.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub format: Option<Format>,
    pub gamma_in: Option<f32>,
    pub gamma_out: Option<f32>,
    pub dither: Option<DitherKernel>,
    pub no_serpentine: bool,
    pub window: Option<usize>,
    pub seed: bool,
    pub quantizer: Option<Quantizer>,
    pub mini_batch: bool,
    pub rng_seed: Option<u64>,
    pub out_dir: Option<PathBuf>,
    pub preview: bool,
}

impl AppConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(
            path = %path.display(),
            format = ?config.format,
            dither = ?config.dither,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Apply command-line overrides on top of this configuration.
    pub fn apply_cli(&mut self, overrides: ConfigOverrides) {
        if let Some(format) = overrides.format {
            self.format = format;
        }
        if let Some(gamma) = overrides.gamma_in {
            self.gamma_in = gamma;
        }
        if let Some(gamma) = overrides.gamma_out {
            self.gamma_out = gamma;
        }
        if overrides.dither.is_some() {
            self.dither = overrides.dither;
        }
        if overrides.no_serpentine {
            self.serpentine = false;
        }
        if let Some(window) = overrides.window {
            self.window = window;
        }
        if let Some(quantizer) = overrides.quantizer {
            self.quantizer = quantizer;
        }
        if let Some(seed) = overrides.rng_seed {
            self.rng_seed = seed;
        }
        if overrides.out_dir.is_some() {
            self.out_dir = overrides.out_dir;
        }
        self.seed |= overrides.seed;
        self.mini_batch |= overrides.mini_batch;
        self.preview |= overrides.preview;
    }

    /// Check values the core library does not validate itself.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.gamma_in.is_finite() && self.gamma_in > 0.0) {
            return Err(ConfigError::InvalidGamma(self.gamma_in));
        }
        Ok(())
    }

    pub fn quantize_mode(&self) -> QuantizeMode {
        match (self.quantizer, self.mini_batch) {
            (Quantizer::MedianCut, _) => QuantizeMode::MedianCut,
            (Quantizer::KMeans, false) => QuantizeMode::KMeans,
            (Quantizer::KMeans, true) => QuantizeMode::MiniBatchKMeans,
        }
    }

    /// Build the core conversion options for this configuration.
    pub fn convert_options(&self) -> ConvertOptions {
        let mut dither = DitherOptions::new().serpentine(self.serpentine);
        if let Some(kernel) = self.dither {
            dither = dither.kernel(kernel);
        }

        ConvertOptions::new()
            .depth(self.format.depth())
            .scope(self.format.scope(self.window))
            .mode(self.quantize_mode())
            .seed(self.seed)
            .dither(dither)
            .gamma_out(self.gamma_out)
            .rng_seed(self.rng_seed)
    }
}
