use crate::pose::state::{Blendshape, PoseState};

/// Canned expression presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Emotion {
    /// All channels at rest.
    Neutral,
    /// Gaze lifted.
    Happy,
    /// Gaze lowered.
    Sad,
    /// Left eye pulled in every direction at once.
    Angry,
}

impl Emotion {
    /// All presets.
    pub const ALL: [Emotion; 4] = [
        Emotion::Neutral,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Emotion::Neutral => "Neutral",
            Emotion::Happy => "Happy",
            Emotion::Sad => "Sad",
            Emotion::Angry => "Angry",
        }
    }

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(name.trim()))
    }

    /// The full pose for this preset. Bones are at rest with identity quaternions.
    pub fn pose(self) -> PoseState {
        let raised: &[Blendshape] = match self {
            Emotion::Neutral => &[],
            Emotion::Happy => &[Blendshape::EyeLookUpLeft],
            Emotion::Sad => &[Blendshape::EyeLookDownLeft],
            Emotion::Angry => &[
                Blendshape::EyeLookInLeft,
                Blendshape::EyeLookOutLeft,
                Blendshape::EyeLookDownLeft,
                Blendshape::EyeLookUpLeft,
            ],
        };
        let mut pose = PoseState::new();
        for b in raised {
            pose.set_blendshape(*b, 1.0);
        }
        pose
    }
}

/// Replace `state` with the named preset. Unknown names leave `state` untouched.
///
/// Returns the matched preset, if any.
pub fn apply_emotion(state: &mut PoseState, name: &str) -> Option<Emotion> {
    let emotion = Emotion::from_name(name)?;
    *state = emotion.pose();
    Some(emotion)
}

#[cfg(test)]
#[path = "../../tests/unit/pose/emotion.rs"]
mod tests;
