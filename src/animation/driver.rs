use rand::Rng;

use crate::pose::state::{Axis, Blendshape, Bone, PoseState};

/// Tuning for [`AnimationDriver`].
///
/// Random offsets are drawn as a uniform integer `k` in `[-steps, steps)` and applied as
/// `k / step_scale`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DriverOpts {
    /// Per-tick probability that both eyes are closed.
    pub blink_probability: f64,
    /// Integer half-range of the head-yaw offset.
    pub head_sway_steps: i32,
    /// Integer half-range of the jaw offset while talking.
    pub jaw_steps: i32,
    /// Divisor mapping integer steps to channel units.
    pub step_scale: f32,
}

impl Default for DriverOpts {
    fn default() -> Self {
        Self {
            blink_probability: 0.03,
            head_sway_steps: 20,
            jaw_steps: 5000,
            step_scale: 2500.0,
        }
    }
}

/// What a single tick changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Eyes were closed this tick.
    pub blinked: bool,
    /// Jaw was driven by the talk animation this tick.
    pub talking: bool,
}

/// Procedural per-tick pose animation: blink, head sway and talking jaw.
///
/// Given the same RNG draw sequence the driver is fully deterministic. Draw order per tick is
/// blink, head sway, then (only while talking) jaw.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnimationDriver {
    opts: DriverOpts,
}

impl AnimationDriver {
    /// Create a driver with explicit tuning.
    pub fn new(opts: DriverOpts) -> Self {
        Self { opts }
    }

    /// Active tuning.
    pub fn opts(&self) -> DriverOpts {
        self.opts
    }

    /// Advance `state` by one tick in place. Never fails; results are clamped.
    pub fn tick<R: Rng + ?Sized>(
        &self,
        state: &mut PoseState,
        talking: bool,
        rng: &mut R,
    ) -> TickReport {
        let blinked = self.blink(state, rng);
        self.sway_head(state, rng);
        self.move_jaw(state, talking, rng);
        TickReport { blinked, talking }
    }

    /// Pure form of [`AnimationDriver::tick`].
    pub fn step<R: Rng + ?Sized>(&self, state: &PoseState, talking: bool, rng: &mut R) -> PoseState {
        let mut next = state.clone();
        self.tick(&mut next, talking, rng);
        next
    }

    fn blink<R: Rng + ?Sized>(&self, state: &mut PoseState, rng: &mut R) -> bool {
        let p = self.opts.blink_probability;
        let closed = p.is_finite() && rng.gen_bool(p.clamp(0.0, 1.0));
        let v = if closed { 1.0 } else { 0.0 };
        state.set_blendshape(Blendshape::EyeBlinkLeft, v);
        state.set_blendshape(Blendshape::EyeBlinkRight, v);
        closed
    }

    fn sway_head<R: Rng + ?Sized>(&self, state: &mut PoseState, rng: &mut R) {
        let yaw = state.bone_axis(Bone::Head, Axis::Y);
        let next = yaw + self.offset(self.opts.head_sway_steps, rng);
        state.set_bone_axis(Bone::Head, Axis::Y, next.clamp(0.0, 1.0));
    }

    fn move_jaw<R: Rng + ?Sized>(&self, state: &mut PoseState, talking: bool, rng: &mut R) {
        if !talking {
            state.set_blendshape(Blendshape::JawOpen, 0.0);
            return;
        }
        let jaw = state.blendshape(Blendshape::JawOpen);
        let next = (1.0 - jaw).abs() + self.offset(self.opts.jaw_steps, rng);
        state.set_blendshape(Blendshape::JawOpen, next);
    }

    fn offset<R: Rng + ?Sized>(&self, steps: i32, rng: &mut R) -> f32 {
        if steps <= 0 || self.opts.step_scale <= 0.0 {
            return 0.0;
        }
        rng.gen_range(-steps..steps) as f32 / self.opts.step_scale
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/driver.rs"]
mod tests;
