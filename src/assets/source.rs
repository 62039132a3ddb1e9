use std::path::Path;

use anyhow::Context;
use image::{DynamicImage, RgbaImage, imageops};

use crate::{
    foundation::{
        color::srgb_u8_to_linear_table,
        core::ImageSize,
        error::{PosecastError, PosecastResult},
    },
    poser::tensor::{ImageTensor, TENSOR_CHANNELS},
};

/// A character image ready for posing.
#[derive(Clone, Debug)]
pub struct SourceImage {
    /// Padded square sRGB image, as displayed.
    pub display: RgbaImage,
    /// Same pixels as a planar linear tensor in `[-1, 1]`.
    pub tensor: ImageTensor,
}

/// Decodes, validates and normalizes character images to the poser's square input.
#[derive(Clone, Debug)]
pub struct SourceImageLoader {
    size: ImageSize,
    srgb_to_linear: [f32; 256],
}

impl SourceImageLoader {
    /// Loader producing `size`×`size` sources.
    pub fn new(size: ImageSize) -> Self {
        Self {
            size,
            srgb_to_linear: srgb_u8_to_linear_table(),
        }
    }

    /// Output side length.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Decode encoded image bytes (PNG, WebP, ...).
    ///
    /// Fails with [`PosecastError::ImageDecode`] for undecodable input and
    /// [`PosecastError::MissingAlphaChannel`] when the decoded image has no alpha.
    #[tracing::instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn load_bytes(&self, bytes: &[u8]) -> PosecastResult<SourceImage> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| PosecastError::image_decode(e.to_string()))?;
        self.prepare(img)
    }

    /// Read and decode an image file. An unreadable path is reported as a decode failure.
    #[tracing::instrument(skip(self), fields(path = %path.display()))]
    pub fn load_path(&self, path: &Path) -> PosecastResult<SourceImage> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read {}", path.display()))
            .map_err(|e| PosecastError::image_decode(format!("{e:#}")))?;
        self.load_bytes(&bytes)
    }

    /// Neutral stand-in shown when no usable character image is available: a grey disc on a
    /// transparent square.
    pub fn placeholder(&self) -> PosecastResult<SourceImage> {
        let side = self.size.0;
        let c = side as f32 / 2.0;
        let r2 = (side as f32 * 0.35).powi(2);
        let display = RgbaImage::from_fn(side, side, |x, y| {
            let (dx, dy) = (x as f32 + 0.5 - c, y as f32 + 0.5 - c);
            if dx * dx + dy * dy <= r2 {
                image::Rgba([128, 128, 128, 255])
            } else {
                image::Rgba([0, 0, 0, 0])
            }
        });
        self.finish(display)
    }

    fn prepare(&self, img: DynamicImage) -> PosecastResult<SourceImage> {
        if !img.color().has_alpha() {
            return Err(PosecastError::MissingAlphaChannel);
        }
        let display = resize_and_pad(&img.to_rgba8(), self.size.0);
        tracing::debug!(
            src_w = img.width(),
            src_h = img.height(),
            side = self.size.0,
            "source image normalized"
        );
        self.finish(display)
    }

    fn finish(&self, display: RgbaImage) -> PosecastResult<SourceImage> {
        let tensor = self.to_tensor(&display)?;
        Ok(SourceImage { display, tensor })
    }

    fn to_tensor(&self, img: &RgbaImage) -> PosecastResult<ImageTensor> {
        let n = self.size.pixel_count();
        let mut data = vec![0.0f32; n * TENSOR_CHANNELS];
        for (i, px) in img.pixels().enumerate() {
            for c in 0..3 {
                data[c * n + i] = self.srgb_to_linear[px[c] as usize] * 2.0 - 1.0;
            }
            data[3 * n + i] = px[3] as f32 / 255.0 * 2.0 - 1.0;
        }
        ImageTensor::new(self.size, data)
    }
}

/// Scale `img` so its longer side equals `side` (aspect preserved, Lanczos), then center it on a
/// fully transparent `side`×`side` canvas.
pub fn resize_and_pad(img: &RgbaImage, side: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    let mut canvas = RgbaImage::new(side, side);
    if w == 0 || h == 0 || side == 0 {
        return canvas;
    }
    let (nw, nh) = if w >= h {
        (side, scaled(h, side, w))
    } else {
        (scaled(w, side, h), side)
    };
    let resized = if (nw, nh) == (w, h) {
        img.clone()
    } else {
        imageops::resize(img, nw, nh, imageops::FilterType::Lanczos3)
    };
    let x = i64::from((side - nw) / 2);
    let y = i64::from((side - nh) / 2);
    imageops::replace(&mut canvas, &resized, x, y);
    canvas
}

// `a * num / den`, rounded, at least 1.
fn scaled(a: u32, num: u32, den: u32) -> u32 {
    let v = (u64::from(a) * u64::from(num) + u64::from(den) / 2) / u64::from(den);
    v.clamp(1, u64::from(num)) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
