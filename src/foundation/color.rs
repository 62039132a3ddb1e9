//! Transfer functions between the sRGB display encoding and linear light.
//!
//! Posers consume and produce linear color; source images and streamed frames are sRGB.

const SRGB_TO_LINEAR_KNEE: f32 = 0.04045;
const LINEAR_TO_SRGB_KNEE: f32 = 0.003_130_805;

/// Decode one sRGB-encoded channel in `[0, 1]` to linear light.
#[inline]
pub fn srgb_to_linear(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    if x <= SRGB_TO_LINEAR_KNEE {
        x / 12.92
    } else {
        ((x + 0.055) / 1.055).powf(2.4)
    }
}

/// Encode one linear channel in `[0, 1]` with the sRGB transfer curve.
#[inline]
pub fn linear_to_srgb(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    if x <= LINEAR_TO_SRGB_KNEE {
        x * 12.92
    } else {
        1.055 * x.powf(1.0 / 2.4) - 0.055
    }
}

/// Quantize a unit-range value to 8 bits, rounding to nearest.
#[inline]
pub fn unit_to_u8(x: f32) -> u8 {
    if x.is_nan() {
        return 0;
    }
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Lookup table from 8-bit sRGB to linear light, built once per loader.
pub(crate) fn srgb_u8_to_linear_table() -> [f32; 256] {
    let mut table = [0.0f32; 256];
    for (i, v) in table.iter_mut().enumerate() {
        *v = srgb_to_linear(i as f32 / 255.0);
    }
    table
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
