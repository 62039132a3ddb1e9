//! Channel table of the pose vector consumed by the poser.
//!
//! The order below is a wire contract with the model checkpoint. Never reorder or insert
//! channels; a different model gets a different converter.

/// Number of channels in a [`crate::PoseVector`].
pub const POSE_VECTOR_LEN: usize = 45;

/// One channel of the pose vector. The discriminant is the channel index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PoseChannel {
    /// Eyebrow, troubled, left.
    EyebrowTroubledLeft = 0,
    /// Eyebrow, troubled, right.
    EyebrowTroubledRight,
    /// Eyebrow, angry, left.
    EyebrowAngryLeft,
    /// Eyebrow, angry, right.
    EyebrowAngryRight,
    /// Eyebrow, lowered, left.
    EyebrowLoweredLeft,
    /// Eyebrow, lowered, right.
    EyebrowLoweredRight,
    /// Eyebrow, raised, left.
    EyebrowRaisedLeft,
    /// Eyebrow, raised, right.
    EyebrowRaisedRight,
    /// Eyebrow, happy, left.
    EyebrowHappyLeft,
    /// Eyebrow, happy, right.
    EyebrowHappyRight,
    /// Eyebrow, serious, left.
    EyebrowSeriousLeft,
    /// Eyebrow, serious, right.
    EyebrowSeriousRight,
    /// Eye closed, left.
    EyeWinkLeft,
    /// Eye closed, right.
    EyeWinkRight,
    /// Eye closed smiling, left.
    EyeHappyWinkLeft,
    /// Eye closed smiling, right.
    EyeHappyWinkRight,
    /// Eye wide open, left.
    EyeSurprisedLeft,
    /// Eye wide open, right.
    EyeSurprisedRight,
    /// Eye half closed, left.
    EyeRelaxedLeft,
    /// Eye half closed, right.
    EyeRelaxedRight,
    /// Upper lid lowered, left.
    EyeUnimpressedLeft,
    /// Upper lid lowered, right.
    EyeUnimpressedRight,
    /// Lower lid raised, left.
    EyeRaisedLowerEyelidLeft,
    /// Lower lid raised, right.
    EyeRaisedLowerEyelidRight,
    /// Iris shrink, left.
    IrisSmallLeft,
    /// Iris shrink, right.
    IrisSmallRight,
    /// Mouth shape "aaa" (jaw open).
    MouthAaa,
    /// Mouth shape "iii".
    MouthIii,
    /// Mouth shape "uuu".
    MouthUuu,
    /// Mouth shape "eee".
    MouthEee,
    /// Mouth shape "ooo".
    MouthOoo,
    /// Mouth shape "delta".
    MouthDelta,
    /// Mouth corner lowered, left.
    MouthLoweredCornerLeft,
    /// Mouth corner lowered, right.
    MouthLoweredCornerRight,
    /// Mouth corner raised, left.
    MouthRaisedCornerLeft,
    /// Mouth corner raised, right.
    MouthRaisedCornerRight,
    /// Mouth smirk.
    MouthSmirk,
    /// Iris rotation, vertical. Range `[-1, 1]`.
    IrisRotationX,
    /// Iris rotation, horizontal. Range `[-1, 1]`.
    IrisRotationY,
    /// Head pitch. Range `[-1, 1]`.
    HeadX,
    /// Head yaw. Range `[-1, 1]`.
    HeadY,
    /// Neck roll. Range `[-1, 1]`.
    NeckZ,
    /// Body yaw. Range `[-1, 1]`.
    BodyY,
    /// Body roll. Range `[-1, 1]`.
    BodyZ,
    /// Breathing phase. Range `[0, 1]`.
    Breathing,
}

impl PoseChannel {
    /// Channel index within the vector.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Declared inclusive range.
    pub fn range(self) -> (f32, f32) {
        use PoseChannel::*;
        match self {
            IrisRotationX | IrisRotationY | HeadX | HeadY | NeckZ | BodyY | BodyZ => (-1.0, 1.0),
            _ => (0.0, 1.0),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/convert/layout.rs"]
mod tests;
