use anyhow::Context;
use bytes::Bytes;
use image::{ImageEncoder, codecs::png::PngEncoder};

use crate::{
    foundation::{
        core::ChannelOrder,
        error::{PosecastError, PosecastResult},
    },
    frame::buffer::FramePixels,
};

/// Encode a frame as an RGBA PNG, swapping channels back from BGRA when needed.
pub fn encode_png(pixels: &FramePixels) -> PosecastResult<Bytes> {
    let expected = pixels.width as usize * pixels.height as usize * 4;
    if pixels.data.len() != expected {
        return Err(PosecastError::validation(format!(
            "{}x{} frame needs {expected} bytes, got {}",
            pixels.width,
            pixels.height,
            pixels.data.len()
        )));
    }

    let swapped;
    let rgba: &[u8] = match pixels.order {
        ChannelOrder::Rgba => &pixels.data,
        ChannelOrder::Bgra => {
            swapped = pixels
                .data
                .chunks_exact(4)
                .flat_map(|px| ChannelOrder::Bgra.read(px))
                .collect::<Vec<u8>>();
            &swapped
        }
    };

    let mut out = Vec::with_capacity(rgba.len() / 4 + 64);
    PngEncoder::new(&mut out)
        .write_image(
            rgba,
            pixels.width,
            pixels.height,
            image::ExtendedColorType::Rgba8,
        )
        .with_context(|| format!("encode {}x{} png", pixels.width, pixels.height))?;
    Ok(Bytes::from(out))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
