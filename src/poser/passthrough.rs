use rayon::prelude::*;

use crate::{
    convert::{converter::PoseVector, layout::PoseChannel},
    foundation::{
        core::ImageSize,
        error::{PosecastError, PosecastResult},
    },
    poser::{
        backend::Poser,
        tensor::{ImageTensor, OutputRange, TENSOR_CHANNELS},
    },
};

/// Fraction of the image width the head may shift at full yaw.
const MAX_YAW_SHIFT: f32 = 0.05;
/// Fraction of the image height the lower face drops at full jaw opening.
const MAX_JAW_DROP: f32 = 0.02;
/// Vertical band (fractions of height) treated as the eye line.
const EYE_BAND: (f32, f32) = (0.30, 0.42);
/// Vertical start (fraction of height) of the region moved by the jaw.
const JAW_START: f32 = 0.55;

/// Geometry-only stand-in for a neural checkpoint.
///
/// Shifts the whole figure horizontally with head yaw, drops the lower face with the jaw, and
/// darkens the eye line while the eyes are closed. Output is deterministic and in
/// [`OutputRange::Signed`], like a real checkpoint, so the rest of the pipeline runs unchanged.
#[derive(Clone, Debug)]
pub struct PassthroughPoser {
    size: ImageSize,
}

impl PassthroughPoser {
    /// Create a poser for square images of side `size`.
    pub fn new(size: ImageSize) -> Self {
        Self { size }
    }
}

impl Poser for PassthroughPoser {
    fn image_size(&self) -> ImageSize {
        self.size
    }

    fn pose(&mut self, source: &ImageTensor, pose: &PoseVector) -> PosecastResult<ImageTensor> {
        if source.size() != self.size {
            return Err(PosecastError::inference(format!(
                "source tensor is {}px, poser expects {}px",
                source.size().0,
                self.size.0
            )));
        }

        let side = self.size.0 as usize;
        let side_f = side as f32;
        let dx = (pose.get(PoseChannel::HeadY) * MAX_YAW_SHIFT * side_f).round() as isize;
        let jaw_dy = (pose.get(PoseChannel::MouthAaa) * MAX_JAW_DROP * side_f).round() as isize;
        let jaw_row = (JAW_START * side_f) as usize;
        let eye_rows = ((EYE_BAND.0 * side_f) as usize)..((EYE_BAND.1 * side_f) as usize);
        let wink = [
            pose.get(PoseChannel::EyeWinkLeft).max(pose.get(PoseChannel::EyeHappyWinkLeft)),
            pose.get(PoseChannel::EyeWinkRight).max(pose.get(PoseChannel::EyeHappyWinkRight)),
        ];
        let range = OutputRange::Signed;
        let transparent = range.from_unit(0.0);
        let n = self.size.pixel_count();

        let mut out = vec![transparent; n * TENSOR_CHANNELS];
        out.par_chunks_mut(side).enumerate().for_each(|(row_idx, row)| {
            let c = row_idx / side;
            let y = row_idx % side;
            let src_plane = source.plane(c);
            let dy = if y >= jaw_row { jaw_dy } else { 0 };
            let sy = y as isize - dy;
            if sy < 0 || sy as usize >= side {
                return;
            }
            // The figure's left half is image right.
            let shade = |x: usize| {
                if c < 3 && eye_rows.contains(&y) {
                    let w = if x >= side / 2 { wink[0] } else { wink[1] };
                    1.0 - 0.6 * w
                } else {
                    1.0
                }
            };
            for (x, dst) in row.iter_mut().enumerate() {
                let sx = x as isize - dx;
                if sx < 0 || sx as usize >= side {
                    continue;
                }
                let v = src_plane[sy as usize * side + sx as usize];
                *dst = range.from_unit(range.to_unit(v) * shade(x));
            }
        });

        ImageTensor::new(self.size, out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/poser/passthrough.rs"]
mod tests;
