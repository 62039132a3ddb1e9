use proptest::prelude::*;

use super::*;
use crate::pose::emotion::Emotion;

#[test]
fn neutral_pose_converts_to_zeros() {
    let v = StandardPoseConverter::default().convert(&PoseState::new());
    assert_eq!(v.as_slice().len(), POSE_VECTOR_LEN);
    assert_eq!(v, PoseVector::zeros());
}

#[test]
fn conversion_is_bitwise_stable() {
    let conv = StandardPoseConverter::default();
    let mut pose = PoseState::new();
    pose.set_blendshape(Blendshape::JawOpen, 0.37);
    pose.set_bone_axis(Bone::Head, Axis::Y, 0.123);
    let a = conv.convert(&pose);
    let b = conv.convert(&pose.clone());
    assert_eq!(a, b);
    let bits_a: Vec<u32> = a.as_slice().iter().map(|x| x.to_bits()).collect();
    let bits_b: Vec<u32> = b.as_slice().iter().map(|x| x.to_bits()).collect();
    assert_eq!(bits_a, bits_b);
}

#[test]
fn equality_distinguishes_signed_zero() {
    let a = PoseVector::zeros();
    let mut b = PoseVector::zeros();
    b.0[0] = -0.0;
    assert_ne!(a, b);
}

#[test]
fn blink_drives_wink_channels() {
    let conv = StandardPoseConverter::default();
    let mut pose = PoseState::new();
    pose.set_blendshape(Blendshape::EyeBlinkLeft, 1.0);
    pose.set_blendshape(Blendshape::EyeBlinkRight, 1.0);
    let v = conv.convert(&pose);
    assert_eq!(v.get(PoseChannel::EyeWinkLeft), 1.0);
    assert_eq!(v.get(PoseChannel::EyeWinkRight), 1.0);
    assert_eq!(v.get(PoseChannel::EyeHappyWinkLeft), 0.0);
}

#[test]
fn smiling_blink_becomes_happy_wink() {
    let conv = StandardPoseConverter::default();
    let mut pose = PoseState::new();
    pose.set_blendshape(Blendshape::EyeBlinkLeft, 1.0);
    pose.set_blendshape(Blendshape::MouthSmileLeft, 1.0);
    let v = conv.convert(&pose);
    assert_eq!(v.get(PoseChannel::EyeWinkLeft), 0.0);
    assert_eq!(v.get(PoseChannel::EyeHappyWinkLeft), 1.0);
    assert_eq!(v.get(PoseChannel::MouthRaisedCornerLeft), 1.0);
}

#[test]
fn relaxed_wink_mode_uses_relaxed_channels() {
    let conv = StandardPoseConverter::new(ConverterOpts {
        wink_mode: WinkMode::Relaxed,
        ..ConverterOpts::default()
    });
    let mut pose = PoseState::new();
    pose.set_blendshape(Blendshape::EyeBlinkRight, 0.5);
    let v = conv.convert(&pose);
    assert_eq!(v.get(PoseChannel::EyeRelaxedRight), 0.5);
    assert_eq!(v.get(PoseChannel::EyeWinkRight), 0.0);
}

#[test]
fn eyebrow_mode_routes_brow_down() {
    let mut pose = PoseState::new();
    pose.set_blendshape(Blendshape::BrowDownLeft, 0.75);
    for (mode, channel) in [
        (EyebrowDownMode::Troubled, PoseChannel::EyebrowTroubledLeft),
        (EyebrowDownMode::Angry, PoseChannel::EyebrowAngryLeft),
        (EyebrowDownMode::Lowered, PoseChannel::EyebrowLoweredLeft),
        (EyebrowDownMode::Serious, PoseChannel::EyebrowSeriousLeft),
    ] {
        let conv = StandardPoseConverter::new(ConverterOpts {
            eyebrow_down_mode: mode,
            ..ConverterOpts::default()
        });
        let v = conv.convert(&pose);
        assert_eq!(v.get(channel), 0.75, "{mode:?}");
        let total: f32 = v.as_slice()[..12].iter().sum();
        assert_eq!(total, 0.75, "{mode:?}");
    }
}

#[test]
fn jaw_and_head_reach_their_channels() {
    let conv = StandardPoseConverter::default();
    let mut pose = PoseState::new();
    pose.set_blendshape(Blendshape::JawOpen, 0.6);
    pose.set_bone_axis(Bone::Head, Axis::Y, 0.4);
    pose.set_bone_axis(Bone::Head, Axis::Z, -0.2);
    let v = conv.convert(&pose);
    assert_eq!(v.get(PoseChannel::MouthAaa), 0.6);
    assert_eq!(v.get(PoseChannel::HeadY), 0.4);
    assert_eq!(v.get(PoseChannel::NeckZ), -0.2);
    assert_eq!(v.get(PoseChannel::BodyY), 0.2);
    assert_eq!(v.get(PoseChannel::BodyZ), -0.1);
    assert_eq!(v.get(PoseChannel::Breathing), 0.0);
}

#[test]
fn emotion_presets_are_distinguishable() {
    let conv = StandardPoseConverter::default();
    let happy = conv.convert(&Emotion::Happy.pose());
    let sad = conv.convert(&Emotion::Sad.pose());
    let neutral = conv.convert(&Emotion::Neutral.pose());
    assert!(happy.get(PoseChannel::IrisRotationX) > 0.0);
    assert!(sad.get(PoseChannel::IrisRotationX) < 0.0);
    assert_ne!(happy, sad);
    assert_eq!(neutral, PoseVector::zeros());
}

proptest! {
    #[test]
    fn every_channel_respects_its_range(values in proptest::collection::vec(-2.0f32..2.0, 64)) {
        let mut pose = PoseState::new();
        for (p, x) in crate::pose::state::PoseParam::all().zip(values.iter().copied()) {
            let value = match p {
                crate::pose::state::PoseParam::BoneQuat(_) => {
                    crate::pose::state::ParamValue::Quat([x, x, x, x])
                }
                _ => crate::pose::state::ParamValue::Scalar(x),
            };
            pose.set(p, value).unwrap();
        }
        let v = StandardPoseConverter::default().convert(&pose);
        for (i, x) in v.as_slice().iter().enumerate() {
            prop_assert!(x.is_finite(), "channel {i} not finite");
            prop_assert!((-1.0..=1.0).contains(x), "channel {i} = {x}");
        }
    }
}
