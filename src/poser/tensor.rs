use std::sync::Arc;

use crate::foundation::{
    core::ImageSize,
    error::{PosecastError, PosecastResult},
};

/// Number of planes in every image tensor (R, G, B, A).
pub const TENSOR_CHANNELS: usize = 4;

/// Planar `f32` RGBA image, channel-major (`CHW`), linear color.
///
/// Cloning is cheap; the sample buffer is shared.
#[derive(Clone, Debug)]
pub struct ImageTensor {
    size: ImageSize,
    data: Arc<[f32]>,
}

impl ImageTensor {
    /// Wrap planar samples. `data.len()` must be `4 * size * size`.
    pub fn new(size: ImageSize, data: Vec<f32>) -> PosecastResult<Self> {
        let expected = size.pixel_count() * TENSOR_CHANNELS;
        if data.len() != expected {
            return Err(PosecastError::validation(format!(
                "image tensor of size {} needs {expected} samples, got {}",
                size.0,
                data.len()
            )));
        }
        Ok(Self {
            size,
            data: data.into(),
        })
    }

    /// A tensor with every sample set to `value`.
    pub fn filled(size: ImageSize, value: f32) -> Self {
        Self {
            size,
            data: vec![value; size.pixel_count() * TENSOR_CHANNELS].into(),
        }
    }

    /// Side length.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// All samples, plane after plane.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// One plane (`0..4` = R, G, B, A).
    pub fn plane(&self, channel: usize) -> &[f32] {
        let n = self.size.pixel_count();
        &self.data[channel * n..(channel + 1) * n]
    }
}

/// Numeric range a poser uses for its output samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputRange {
    /// Samples in `[-1, 1]`.
    #[default]
    Signed,
    /// Samples in `[0, 1]`.
    Unit,
}

impl OutputRange {
    /// Map one sample to `[0, 1]` (not clamped).
    #[inline]
    pub fn to_unit(self, x: f32) -> f32 {
        match self {
            Self::Signed => (x + 1.0) * 0.5,
            Self::Unit => x,
        }
    }

    /// Map a `[0, 1]` value into this range.
    #[inline]
    pub fn from_unit(self, x: f32) -> f32 {
        match self {
            Self::Signed => x * 2.0 - 1.0,
            Self::Unit => x,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/poser/tensor.rs"]
mod tests;
