use super::*;

#[test]
fn new_checks_sample_count() {
    let size = ImageSize(3);
    assert!(ImageTensor::new(size, vec![0.0; 36]).is_ok());
    let err = ImageTensor::new(size, vec![0.0; 35]).unwrap_err();
    assert!(matches!(err, PosecastError::Validation(_)));
}

#[test]
fn planes_are_channel_major() {
    let size = ImageSize(2);
    let data: Vec<f32> = (0..16).map(|i| i as f32).collect();
    let t = ImageTensor::new(size, data).unwrap();
    assert_eq!(t.plane(0), &[0.0, 1.0, 2.0, 3.0]);
    assert_eq!(t.plane(3), &[12.0, 13.0, 14.0, 15.0]);
    assert_eq!(t.data().len(), 16);
}

#[test]
fn clones_share_samples() {
    let t = ImageTensor::filled(ImageSize(4), 0.5);
    let u = t.clone();
    assert_eq!(t.data().as_ptr(), u.data().as_ptr());
}

#[test]
fn output_ranges_map_to_unit() {
    assert_eq!(OutputRange::Signed.to_unit(-1.0), 0.0);
    assert_eq!(OutputRange::Signed.to_unit(1.0), 1.0);
    assert_eq!(OutputRange::Signed.from_unit(0.5), 0.0);
    assert_eq!(OutputRange::Unit.to_unit(0.25), 0.25);
}
