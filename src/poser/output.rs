use rayon::prelude::*;

use crate::{
    foundation::{
        color::{linear_to_srgb, unit_to_u8},
        core::ChannelOrder,
    },
    frame::buffer::FramePixels,
    poser::tensor::{ImageTensor, OutputRange},
};

/// Convert a poser output tensor into interleaved 8-bit pixels.
///
/// Samples are mapped from `range` to `[0, 1]`, RGB goes through the sRGB transfer curve (alpha
/// stays linear), then everything is quantized and written in `order`.
pub fn tensor_to_pixels(
    tensor: &ImageTensor,
    range: OutputRange,
    order: ChannelOrder,
) -> FramePixels {
    let side = tensor.size().0;
    let n = tensor.size().pixel_count();
    let (r, g, b, a) = (
        tensor.plane(0),
        tensor.plane(1),
        tensor.plane(2),
        tensor.plane(3),
    );

    let mut data = vec![0u8; n * 4];
    data.par_chunks_mut(4).enumerate().for_each(|(i, px)| {
        let rgb = |plane: &[f32]| unit_to_u8(linear_to_srgb(range.to_unit(plane[i])));
        let rgba = [rgb(r), rgb(g), rgb(b), unit_to_u8(range.to_unit(a[i]))];
        order.write(px, rgba);
    });

    FramePixels {
        width: side,
        height: side,
        order,
        data,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/poser/output.rs"]
mod tests;
