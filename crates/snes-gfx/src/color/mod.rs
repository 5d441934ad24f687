//! Color value transforms shared by input decoding and palette encoding.

mod gamma;

pub use gamma::{adjust_gamma, adjust_gamma_slice};
