use super::*;

#[test]
fn image_size_rejects_zero() {
    assert!(ImageSize::new(0).is_err());
    assert_eq!(ImageSize::new(512).unwrap().pixel_count(), 512 * 512);
}

#[test]
fn frame_seq_increments_and_saturates() {
    assert_eq!(FrameSeq(0).next(), FrameSeq(1));
    assert_eq!(FrameSeq(u64::MAX).next(), FrameSeq(u64::MAX));
}

#[test]
fn channel_order_swaps_red_and_blue_only() {
    let mut px = [0u8; 4];
    ChannelOrder::Bgra.write(&mut px, [10, 20, 30, 40]);
    assert_eq!(px, [30, 20, 10, 40]);
    assert_eq!(ChannelOrder::Bgra.read(&px), [10, 20, 30, 40]);

    ChannelOrder::Rgba.write(&mut px, [10, 20, 30, 40]);
    assert_eq!(px, [10, 20, 30, 40]);
}
