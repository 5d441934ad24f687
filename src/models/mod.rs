pub mod config;

pub use config::{AppConfig, ConfigOverrides, Format, Quantizer};
