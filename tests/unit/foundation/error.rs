use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PosecastError::image_decode("x")
            .to_string()
            .contains("image decode error:")
    );
    assert!(
        PosecastError::inference("x")
            .to_string()
            .contains("inference error:")
    );
    assert!(
        PosecastError::device_unavailable("x")
            .to_string()
            .contains("device unavailable:")
    );
    assert!(
        PosecastError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PosecastError::unknown_parameter("eyeBlinkMiddle")
            .to_string()
            .contains("eyeBlinkMiddle")
    );
}

#[test]
fn only_device_errors_are_fatal() {
    assert!(!PosecastError::device_unavailable("cuda").is_recoverable());
    assert!(PosecastError::MissingAlphaChannel.is_recoverable());
    assert!(PosecastError::inference("nan").is_recoverable());
    assert!(PosecastError::image_decode("garbage").is_recoverable());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PosecastError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
