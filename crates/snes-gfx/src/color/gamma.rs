//! Power-law gamma adjustment.

/// Raise `value` to `gamma`.
///
/// Used in both directions: decoding applies `gamma_in`, the palette encoder
/// applies `1 / gamma_out`. A gamma of exactly 1.0 returns `value` unchanged.
#[inline]
pub fn adjust_gamma(value: f32, gamma: f32) -> f32 {
    if gamma == 1.0 {
        value
    } else {
        value.powf(gamma)
    }
}

/// Apply [`adjust_gamma`] to every component in place.
pub fn adjust_gamma_slice(values: &mut [f32], gamma: f32) {
    if gamma == 1.0 {
        return;
    }
    for v in values {
        *v = v.powf(gamma);
    }
}
