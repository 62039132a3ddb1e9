use crate::foundation::error::{PosecastError, PosecastResult};

/// Publish sequence number of a rendered frame. Strictly increasing per [`crate::FrameBuffer`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameSeq(pub u64);

impl FrameSeq {
    /// The sequence number that follows `self`.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Side length of the square images a poser consumes and produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImageSize(pub u32);

impl ImageSize {
    /// Validate a non-zero side length.
    pub fn new(side: u32) -> PosecastResult<Self> {
        if side == 0 {
            return Err(PosecastError::validation("image size must be > 0"));
        }
        Ok(Self(side))
    }

    /// Number of pixels in the square.
    pub fn pixel_count(self) -> usize {
        (self.0 as usize).saturating_mul(self.0 as usize)
    }
}

/// Byte order of the four channels of an 8-bit pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    /// Red, green, blue, alpha.
    #[default]
    Rgba,
    /// Blue, green, red, alpha.
    Bgra,
}

impl ChannelOrder {
    /// Write one pixel given in RGBA order into `dst` using this order.
    #[inline]
    pub fn write(self, dst: &mut [u8], rgba: [u8; 4]) {
        match self {
            Self::Rgba => dst[..4].copy_from_slice(&rgba),
            Self::Bgra => dst[..4].copy_from_slice(&[rgba[2], rgba[1], rgba[0], rgba[3]]),
        }
    }

    /// Read one pixel stored in this order back as RGBA.
    #[inline]
    pub fn read(self, src: &[u8]) -> [u8; 4] {
        match self {
            Self::Rgba => [src[0], src[1], src[2], src[3]],
            Self::Bgra => [src[2], src[1], src[0], src[3]],
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
