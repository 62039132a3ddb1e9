use super::*;
use crate::foundation::core::ImageSize;

fn tensor_rgba(value: [f32; 4]) -> ImageTensor {
    let size = ImageSize(2);
    let n = size.pixel_count();
    let mut data = Vec::with_capacity(n * 4);
    for v in value {
        data.extend(std::iter::repeat_n(v, n));
    }
    ImageTensor::new(size, data).unwrap()
}

#[test]
fn signed_extremes_map_to_byte_extremes() {
    let px = tensor_to_pixels(
        &tensor_rgba([1.0, -1.0, 1.0, 1.0]),
        OutputRange::Signed,
        ChannelOrder::Rgba,
    );
    assert_eq!((px.width, px.height), (2, 2));
    assert_eq!(px.data.len(), 16);
    assert_eq!(&px.data[..4], &[255, 0, 255, 255]);
}

#[test]
fn alpha_skips_the_transfer_curve() {
    let px = tensor_to_pixels(
        &tensor_rgba([0.5, 0.5, 0.5, 0.5]),
        OutputRange::Unit,
        ChannelOrder::Rgba,
    );
    // linear 0.5 encodes to about 188 in sRGB; alpha stays at 128.
    assert_eq!(px.data[0], 188);
    assert_eq!(px.data[3], 128);
}

#[test]
fn bgra_order_swaps_red_and_blue() {
    let px = tensor_to_pixels(
        &tensor_rgba([1.0, 0.0, 0.0, 1.0]),
        OutputRange::Unit,
        ChannelOrder::Bgra,
    );
    assert_eq!(&px.data[..4], &[0, 0, 255, 255]);
    assert_eq!(px.order.read(&px.data[..4]), [255, 0, 0, 255]);
}

#[test]
fn out_of_range_samples_saturate() {
    let px = tensor_to_pixels(
        &tensor_rgba([3.0, -3.0, f32::NAN, 2.0]),
        OutputRange::Signed,
        ChannelOrder::Rgba,
    );
    assert_eq!(px.data[0], 255);
    assert_eq!(px.data[1], 0);
    assert_eq!(px.data[2], 0);
    assert_eq!(px.data[3], 255);
}
