use crate::{
    convert::layout::{POSE_VECTOR_LEN, PoseChannel},
    pose::state::{Axis, Blendshape, Bone, PoseState},
};

/// Fixed-order numeric pose consumed by a [`crate::Poser`].
///
/// Equality is bitwise, so two vectors compare equal only if the poser would receive exactly
/// the same input.
#[derive(Clone, Copy, Debug)]
pub struct PoseVector([f32; POSE_VECTOR_LEN]);

impl PoseVector {
    /// All channels zero.
    pub fn zeros() -> Self {
        Self([0.0; POSE_VECTOR_LEN])
    }

    /// Channels in wire order.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Value of one channel.
    pub fn get(&self, channel: PoseChannel) -> f32 {
        self.0[channel.index()]
    }

    fn set(&mut self, channel: PoseChannel, value: f32) {
        let (lo, hi) = channel.range();
        self.0[channel.index()] = if value.is_nan() { 0.0 } else { value.clamp(lo, hi) };
    }
}

impl PartialEq for PoseVector {
    fn eq(&self, other: &Self) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Eq for PoseVector {}

/// Stateless mapping from a [`PoseState`] to the poser's input vector.
pub trait PoseConverter: Send + Sync {
    /// Convert a pose. Must be total and deterministic.
    fn convert(&self, state: &PoseState) -> PoseVector;
}

/// Which eyebrow shape `browDown*` drives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EyebrowDownMode {
    /// Inner ends raised, worried look.
    Troubled,
    /// Inner ends pulled down.
    #[default]
    Angry,
    /// Whole brow lowered.
    Lowered,
    /// Flat, stern brow.
    Serious,
}

/// Which eye shape `eyeBlink*` drives when not smiling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinkMode {
    /// Fully closed lids.
    #[default]
    Normal,
    /// Half-closed, sleepy lids.
    Relaxed,
}

/// Options for [`StandardPoseConverter`], fixed at startup.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ConverterOpts {
    /// Interpretation of `browDownLeft/Right`.
    pub eyebrow_down_mode: EyebrowDownMode,
    /// Interpretation of `eyeBlinkLeft/Right`.
    pub wink_mode: WinkMode,
    /// Constant iris shrink written to both iris channels.
    pub iris_small: f32,
    /// Fraction of head yaw/roll the body follows.
    pub body_follow: f32,
}

impl Default for ConverterOpts {
    fn default() -> Self {
        Self {
            eyebrow_down_mode: EyebrowDownMode::Angry,
            wink_mode: WinkMode::Normal,
            iris_small: 0.0,
            body_follow: 0.5,
        }
    }
}

/// Converter for the 45-channel layout in [`crate::PoseChannel`].
///
/// Mapping:
/// - brows: `browDown*` to the shape picked by [`EyebrowDownMode`], `browInnerUp + browOuterUp*`
///   to raised, `cheekSquint*` to happy
/// - eyes: `eyeBlink*` split between wink (or relaxed) and happy-wink by `mouthSmile*`,
///   `eyeWide*` to surprised, `eyeSquint*` to raised lower eyelid
/// - mouth: `jawOpen` to aaa, `mouthStretch*` to iii, `mouthPucker` to uuu, `mouthUpperUp*` to
///   eee, `mouthFunnel` to ooo, `mouthShrugLower` to delta, frown/smile to corners,
///   `|mouthLeft - mouthRight|` to smirk
/// - iris rotation: eye bones plus the gaze blendshapes
/// - head: head bone X/Y/Z; body follows yaw and roll by `body_follow`
/// - breathing is always zero so identical poses give identical vectors
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardPoseConverter {
    opts: ConverterOpts,
}

impl StandardPoseConverter {
    /// Create a converter with explicit options.
    pub fn new(opts: ConverterOpts) -> Self {
        Self { opts }
    }

    /// Active options.
    pub fn opts(&self) -> ConverterOpts {
        self.opts
    }
}

fn avg(a: f32, b: f32) -> f32 {
    (a + b) * 0.5
}

impl PoseConverter for StandardPoseConverter {
    fn convert(&self, s: &PoseState) -> PoseVector {
        use Blendshape as B;
        use PoseChannel as C;

        let mut v = PoseVector::zeros();
        let bs = |b: Blendshape| s.blendshape(b);

        let (down_l, down_r) = match self.opts.eyebrow_down_mode {
            EyebrowDownMode::Troubled => (C::EyebrowTroubledLeft, C::EyebrowTroubledRight),
            EyebrowDownMode::Angry => (C::EyebrowAngryLeft, C::EyebrowAngryRight),
            EyebrowDownMode::Lowered => (C::EyebrowLoweredLeft, C::EyebrowLoweredRight),
            EyebrowDownMode::Serious => (C::EyebrowSeriousLeft, C::EyebrowSeriousRight),
        };
        v.set(down_l, bs(B::BrowDownLeft));
        v.set(down_r, bs(B::BrowDownRight));
        v.set(C::EyebrowRaisedLeft, bs(B::BrowInnerUp) + bs(B::BrowOuterUpLeft));
        v.set(C::EyebrowRaisedRight, bs(B::BrowInnerUp) + bs(B::BrowOuterUpRight));
        v.set(C::EyebrowHappyLeft, bs(B::CheekSquintLeft));
        v.set(C::EyebrowHappyRight, bs(B::CheekSquintRight));

        let (closed_l, closed_r) = match self.opts.wink_mode {
            WinkMode::Normal => (C::EyeWinkLeft, C::EyeWinkRight),
            WinkMode::Relaxed => (C::EyeRelaxedLeft, C::EyeRelaxedRight),
        };
        let smile_l = bs(B::MouthSmileLeft);
        let smile_r = bs(B::MouthSmileRight);
        let blink_l = bs(B::EyeBlinkLeft);
        let blink_r = bs(B::EyeBlinkRight);
        v.set(closed_l, blink_l * (1.0 - smile_l));
        v.set(closed_r, blink_r * (1.0 - smile_r));
        v.set(C::EyeHappyWinkLeft, blink_l * smile_l);
        v.set(C::EyeHappyWinkRight, blink_r * smile_r);
        v.set(C::EyeSurprisedLeft, bs(B::EyeWideLeft));
        v.set(C::EyeSurprisedRight, bs(B::EyeWideRight));
        v.set(C::EyeRaisedLowerEyelidLeft, bs(B::EyeSquintLeft));
        v.set(C::EyeRaisedLowerEyelidRight, bs(B::EyeSquintRight));
        v.set(C::IrisSmallLeft, self.opts.iris_small);
        v.set(C::IrisSmallRight, self.opts.iris_small);

        v.set(C::MouthAaa, bs(B::JawOpen));
        v.set(C::MouthIii, avg(bs(B::MouthStretchLeft), bs(B::MouthStretchRight)));
        v.set(C::MouthUuu, bs(B::MouthPucker));
        v.set(C::MouthEee, avg(bs(B::MouthUpperUpLeft), bs(B::MouthUpperUpRight)));
        v.set(C::MouthOoo, bs(B::MouthFunnel));
        v.set(C::MouthDelta, bs(B::MouthShrugLower));
        v.set(C::MouthLoweredCornerLeft, bs(B::MouthFrownLeft));
        v.set(C::MouthLoweredCornerRight, bs(B::MouthFrownRight));
        v.set(C::MouthRaisedCornerLeft, smile_l);
        v.set(C::MouthRaisedCornerRight, smile_r);
        v.set(C::MouthSmirk, (bs(B::MouthLeft) - bs(B::MouthRight)).abs());

        let gaze_up = avg(
            bs(B::EyeLookUpLeft) - bs(B::EyeLookDownLeft),
            bs(B::EyeLookUpRight) - bs(B::EyeLookDownRight),
        );
        let gaze_side = avg(
            bs(B::EyeLookOutLeft) - bs(B::EyeLookInLeft),
            bs(B::EyeLookInRight) - bs(B::EyeLookOutRight),
        );
        let eye_x = avg(
            s.bone_axis(Bone::LeftEye, Axis::X),
            s.bone_axis(Bone::RightEye, Axis::X),
        );
        let eye_y = avg(
            s.bone_axis(Bone::LeftEye, Axis::Y),
            s.bone_axis(Bone::RightEye, Axis::Y),
        );
        v.set(C::IrisRotationX, eye_x + gaze_up);
        v.set(C::IrisRotationY, eye_y + gaze_side);

        let head_y = s.bone_axis(Bone::Head, Axis::Y);
        let neck_z = s.bone_axis(Bone::Head, Axis::Z);
        v.set(C::HeadX, s.bone_axis(Bone::Head, Axis::X));
        v.set(C::HeadY, head_y);
        v.set(C::NeckZ, neck_z);
        v.set(C::BodyY, head_y * self.opts.body_follow);
        v.set(C::BodyZ, neck_z * self.opts.body_follow);
        v.set(C::Breathing, 0.0);

        v
    }
}

#[cfg(test)]
#[path = "../../tests/unit/convert/converter.rs"]
mod tests;
