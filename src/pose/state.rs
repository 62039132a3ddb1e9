use serde::ser::SerializeMap;

use crate::foundation::error::{PosecastError, PosecastResult};

macro_rules! blendshapes {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// ARKit-style facial blendshape channels, in canonical order.
        ///
        /// Every blendshape is a scalar in `[0, 1]`.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum Blendshape {
            $(
                #[doc = $name]
                $variant,
            )+
        }

        impl Blendshape {
            /// All blendshapes in canonical order.
            pub const ALL: &'static [Blendshape] = &[$(Blendshape::$variant),+];
            /// Number of blendshape channels.
            pub const COUNT: usize = Self::ALL.len();

            /// Wire name of this channel.
            pub fn name(self) -> &'static str {
                match self {
                    $(Blendshape::$variant => $name,)+
                }
            }

            /// Look a channel up by its wire name (case-sensitive).
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Blendshape::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

blendshapes! {
    EyeLookInLeft => "eyeLookInLeft",
    EyeLookOutLeft => "eyeLookOutLeft",
    EyeLookDownLeft => "eyeLookDownLeft",
    EyeLookUpLeft => "eyeLookUpLeft",
    EyeBlinkLeft => "eyeBlinkLeft",
    EyeSquintLeft => "eyeSquintLeft",
    EyeWideLeft => "eyeWideLeft",
    EyeLookInRight => "eyeLookInRight",
    EyeLookOutRight => "eyeLookOutRight",
    EyeLookDownRight => "eyeLookDownRight",
    EyeLookUpRight => "eyeLookUpRight",
    EyeBlinkRight => "eyeBlinkRight",
    EyeSquintRight => "eyeSquintRight",
    EyeWideRight => "eyeWideRight",
    BrowDownLeft => "browDownLeft",
    BrowOuterUpLeft => "browOuterUpLeft",
    BrowDownRight => "browDownRight",
    BrowOuterUpRight => "browOuterUpRight",
    BrowInnerUp => "browInnerUp",
    NoseSneerLeft => "noseSneerLeft",
    NoseSneerRight => "noseSneerRight",
    CheekSquintLeft => "cheekSquintLeft",
    CheekSquintRight => "cheekSquintRight",
    CheekPuff => "cheekPuff",
    MouthLeft => "mouthLeft",
    MouthDimpleLeft => "mouthDimpleLeft",
    MouthFrownLeft => "mouthFrownLeft",
    MouthLowerDownLeft => "mouthLowerDownLeft",
    MouthPressLeft => "mouthPressLeft",
    MouthSmileLeft => "mouthSmileLeft",
    MouthStretchLeft => "mouthStretchLeft",
    MouthUpperUpLeft => "mouthUpperUpLeft",
    MouthRight => "mouthRight",
    MouthDimpleRight => "mouthDimpleRight",
    MouthFrownRight => "mouthFrownRight",
    MouthLowerDownRight => "mouthLowerDownRight",
    MouthPressRight => "mouthPressRight",
    MouthSmileRight => "mouthSmileRight",
    MouthStretchRight => "mouthStretchRight",
    MouthUpperUpRight => "mouthUpperUpRight",
    MouthClose => "mouthClose",
    MouthFunnel => "mouthFunnel",
    MouthPucker => "mouthPucker",
    MouthRollLower => "mouthRollLower",
    MouthRollUpper => "mouthRollUpper",
    MouthShrugLower => "mouthShrugLower",
    MouthShrugUpper => "mouthShrugUpper",
    JawLeft => "jawLeft",
    JawRight => "jawRight",
    JawForward => "jawForward",
    JawOpen => "jawOpen",
    TongueOut => "tongueOut",
}

/// Rigid bones carried by the pose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bone {
    /// Head rotation.
    Head,
    /// Left eyeball rotation.
    LeftEye,
    /// Right eyeball rotation.
    RightEye,
}

impl Bone {
    /// All bones in canonical order.
    pub const ALL: [Bone; 3] = [Bone::Head, Bone::LeftEye, Bone::RightEye];

    /// Wire names of `[X, Y, Z, Quat]` for this bone.
    pub fn param_names(self) -> [&'static str; 4] {
        match self {
            Bone::Head => ["headBoneX", "headBoneY", "headBoneZ", "headBoneQuat"],
            Bone::LeftEye => [
                "leftEyeBoneX",
                "leftEyeBoneY",
                "leftEyeBoneZ",
                "leftEyeBoneQuat",
            ],
            Bone::RightEye => [
                "rightEyeBoneX",
                "rightEyeBoneY",
                "rightEyeBoneZ",
                "rightEyeBoneQuat",
            ],
        }
    }
}

/// Rotation axis of a bone channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Pitch.
    X,
    /// Yaw.
    Y,
    /// Roll.
    Z,
}

impl Axis {
    /// All axes in canonical order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

/// One named entry of the fixed pose schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PoseParam {
    /// A blendshape channel, range `[0, 1]`.
    Blendshape(Blendshape),
    /// One rotation channel of a bone, range `[-1, 1]`.
    BoneAxis(Bone, Axis),
    /// Bone orientation quaternion `[x, y, z, w]`, each component in `[-1, 1]`.
    BoneQuat(Bone),
}

/// Number of named parameters in the schema.
pub const POSE_PARAM_COUNT: usize = Blendshape::COUNT + Bone::ALL.len() * 4;

impl PoseParam {
    /// Resolve a wire name; names outside the schema are rejected.
    pub fn from_name(name: &str) -> PosecastResult<Self> {
        if let Some(b) = Blendshape::from_name(name) {
            return Ok(Self::Blendshape(b));
        }
        for bone in Bone::ALL {
            let names = bone.param_names();
            for (axis, axis_name) in Axis::ALL.into_iter().zip(&names[..3]) {
                if *axis_name == name {
                    return Ok(Self::BoneAxis(bone, axis));
                }
            }
            if names[3] == name {
                return Ok(Self::BoneQuat(bone));
            }
        }
        Err(PosecastError::unknown_parameter(name))
    }

    /// Wire name of this parameter.
    pub fn name(self) -> &'static str {
        match self {
            Self::Blendshape(b) => b.name(),
            Self::BoneAxis(bone, axis) => bone.param_names()[axis as usize],
            Self::BoneQuat(bone) => bone.param_names()[3],
        }
    }

    /// Declared inclusive value range.
    pub fn range(self) -> (f32, f32) {
        match self {
            Self::Blendshape(_) => (0.0, 1.0),
            Self::BoneAxis(..) | Self::BoneQuat(_) => (-1.0, 1.0),
        }
    }

    /// Every parameter in schema order: blendshapes first, then per bone `X, Y, Z, Quat`.
    pub fn all() -> impl Iterator<Item = PoseParam> {
        Blendshape::ALL
            .iter()
            .map(|&b| PoseParam::Blendshape(b))
            .chain(Bone::ALL.into_iter().flat_map(|bone| {
                Axis::ALL
                    .into_iter()
                    .map(move |axis| PoseParam::BoneAxis(bone, axis))
                    .chain(std::iter::once(PoseParam::BoneQuat(bone)))
            }))
    }
}

/// Value of a pose parameter.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Blendshape or bone-axis value.
    Scalar(f32),
    /// Bone quaternion `[x, y, z, w]`.
    Quat([f32; 4]),
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BonePose {
    rotation: [f32; 3],
    quat: [f32; 4],
}

impl Default for BonePose {
    fn default() -> Self {
        Self {
            rotation: [0.0; 3],
            quat: IDENTITY_QUAT,
        }
    }
}

const IDENTITY_QUAT: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

fn clamp_channel(v: f32, (lo, hi): (f32, f32)) -> f32 {
    if v.is_nan() {
        return 0.0f32.clamp(lo, hi);
    }
    v.clamp(lo, hi)
}

/// Facial pose as a fixed-schema aggregate.
///
/// All mutation goes through clamping setters, so every value is within its declared range at
/// all times.
#[derive(Clone, Debug, PartialEq)]
pub struct PoseState {
    blendshapes: [f32; Blendshape::COUNT],
    bones: [BonePose; 3],
}

impl Default for PoseState {
    fn default() -> Self {
        Self {
            blendshapes: [0.0; Blendshape::COUNT],
            bones: [BonePose::default(); 3],
        }
    }
}

impl PoseState {
    /// Neutral pose: all channels zero, identity quaternions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a blendshape.
    pub fn blendshape(&self, b: Blendshape) -> f32 {
        self.blendshapes[b as usize]
    }

    /// Set a blendshape, clamped into `[0, 1]`.
    pub fn set_blendshape(&mut self, b: Blendshape, value: f32) {
        self.blendshapes[b as usize] = clamp_channel(value, (0.0, 1.0));
    }

    /// Current value of one bone rotation channel.
    pub fn bone_axis(&self, bone: Bone, axis: Axis) -> f32 {
        self.bones[bone as usize].rotation[axis as usize]
    }

    /// Set one bone rotation channel, clamped into `[-1, 1]`.
    pub fn set_bone_axis(&mut self, bone: Bone, axis: Axis, value: f32) {
        self.bones[bone as usize].rotation[axis as usize] = clamp_channel(value, (-1.0, 1.0));
    }

    /// Current bone quaternion.
    pub fn bone_quat(&self, bone: Bone) -> [f32; 4] {
        self.bones[bone as usize].quat
    }

    /// Set a bone quaternion, each component clamped into `[-1, 1]`.
    pub fn set_bone_quat(&mut self, bone: Bone, quat: [f32; 4]) {
        self.bones[bone as usize].quat = quat.map(|c| clamp_channel(c, (-1.0, 1.0)));
    }

    /// Read any parameter.
    pub fn get(&self, param: PoseParam) -> ParamValue {
        match param {
            PoseParam::Blendshape(b) => ParamValue::Scalar(self.blendshape(b)),
            PoseParam::BoneAxis(bone, axis) => ParamValue::Scalar(self.bone_axis(bone, axis)),
            PoseParam::BoneQuat(bone) => ParamValue::Quat(self.bone_quat(bone)),
        }
    }

    /// Write any parameter. The value shape must match the parameter.
    pub fn set(&mut self, param: PoseParam, value: ParamValue) -> PosecastResult<()> {
        match (param, value) {
            (PoseParam::Blendshape(b), ParamValue::Scalar(v)) => self.set_blendshape(b, v),
            (PoseParam::BoneAxis(bone, axis), ParamValue::Scalar(v)) => {
                self.set_bone_axis(bone, axis, v)
            }
            (PoseParam::BoneQuat(bone), ParamValue::Quat(q)) => self.set_bone_quat(bone, q),
            (p, ParamValue::Quat(_)) => {
                return Err(PosecastError::validation(format!(
                    "parameter \"{}\" takes a scalar, got a quaternion",
                    p.name()
                )));
            }
            (p, ParamValue::Scalar(_)) => {
                return Err(PosecastError::validation(format!(
                    "parameter \"{}\" takes a quaternion [x, y, z, w], got a scalar",
                    p.name()
                )));
            }
        }
        Ok(())
    }

    /// Read a parameter by wire name.
    pub fn get_named(&self, name: &str) -> PosecastResult<ParamValue> {
        Ok(self.get(PoseParam::from_name(name)?))
    }

    /// Write a parameter by wire name. Unknown names are rejected.
    pub fn set_named(&mut self, name: &str, value: ParamValue) -> PosecastResult<()> {
        self.set(PoseParam::from_name(name)?, value)
    }

    /// Whether every value is inside its declared range.
    pub fn is_within_range(&self) -> bool {
        PoseParam::all().all(|p| {
            let (lo, hi) = p.range();
            match self.get(p) {
                ParamValue::Scalar(v) => (lo..=hi).contains(&v),
                ParamValue::Quat(q) => q.iter().all(|c| (lo..=hi).contains(c)),
            }
        })
    }

    /// Raw bit patterns of every value in schema order.
    pub fn bit_pattern(&self) -> Vec<u32> {
        let mut out = Vec::with_capacity(Blendshape::COUNT + 7 * Bone::ALL.len());
        out.extend(self.blendshapes.iter().map(|v| v.to_bits()));
        for bone in &self.bones {
            out.extend(bone.rotation.iter().map(|v| v.to_bits()));
            out.extend(bone.quat.iter().map(|v| v.to_bits()));
        }
        out
    }
}

impl serde::Serialize for PoseState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(POSE_PARAM_COUNT))?;
        for p in PoseParam::all() {
            map.serialize_entry(p.name(), &self.get(p))?;
        }
        map.end()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pose/state.rs"]
mod tests;
