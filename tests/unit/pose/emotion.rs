use super::*;
use crate::pose::state::{Axis, Bone};

#[test]
fn presets_overwrite_the_whole_pose() {
    let mut pose = PoseState::new();
    pose.set_blendshape(Blendshape::JawOpen, 0.8);
    pose.set_blendshape(Blendshape::EyeBlinkRight, 1.0);
    pose.set_bone_axis(Bone::Head, Axis::Y, 0.4);

    assert_eq!(apply_emotion(&mut pose, "Happy"), Some(Emotion::Happy));
    assert_eq!(pose.blendshape(Blendshape::EyeLookUpLeft), 1.0);
    assert_eq!(pose.blendshape(Blendshape::JawOpen), 0.0);
    assert_eq!(pose.blendshape(Blendshape::EyeBlinkRight), 0.0);
    assert_eq!(pose.bone_axis(Bone::Head, Axis::Y), 0.0);
    assert_eq!(pose.bone_quat(Bone::Head), [0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn angry_engages_all_left_gaze_channels() {
    let pose = Emotion::Angry.pose();
    for b in [
        Blendshape::EyeLookInLeft,
        Blendshape::EyeLookOutLeft,
        Blendshape::EyeLookDownLeft,
        Blendshape::EyeLookUpLeft,
    ] {
        assert_eq!(pose.blendshape(b), 1.0);
    }
    assert_eq!(pose.blendshape(Blendshape::EyeLookUpRight), 0.0);
}

#[test]
fn lookup_is_case_insensitive() {
    assert_eq!(Emotion::from_name("sad"), Some(Emotion::Sad));
    assert_eq!(Emotion::from_name(" ANGRY "), Some(Emotion::Angry));
}

#[test]
fn unknown_preset_is_a_no_op() {
    let mut pose = PoseState::new();
    pose.set_blendshape(Blendshape::JawOpen, 0.3);
    let before = pose.clone();
    assert_eq!(apply_emotion(&mut pose, "Bored"), None);
    assert_eq!(pose, before);
}
