use crate::{
    convert::converter::PoseVector,
    foundation::{
        core::ImageSize,
        error::{PosecastError, PosecastResult},
    },
    poser::{
        passthrough::PassthroughPoser,
        tensor::{ImageTensor, OutputRange},
    },
};

/// Neural posing capability: renders a source image under a pose.
///
/// Implementations are not reentrant. The render loop owns its poser and is the only caller, so
/// calls are strictly serialized. Tests substitute deterministic doubles.
pub trait Poser: Send {
    /// Side length of the square images this poser consumes and produces.
    fn image_size(&self) -> ImageSize;

    /// Range of the output samples. Inputs are always supplied in [`OutputRange::Signed`].
    fn output_range(&self) -> OutputRange {
        OutputRange::Signed
    }

    /// Render `source` (linear RGBA tensor) under `pose`. The output is linear RGBA.
    fn pose(&mut self, source: &ImageTensor, pose: &PoseVector) -> PosecastResult<ImageTensor>;
}

/// Model checkpoint flavour, selected once at process start.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ModelVariant {
    /// Full network, 32-bit weights.
    StandardFloat,
    /// Separable convolutions, 32-bit weights.
    #[default]
    SeparableFloat,
    /// Full network, 16-bit weights.
    StandardHalf,
    /// Separable convolutions, 16-bit weights.
    SeparableHalf,
}

impl ModelVariant {
    /// Whether the checkpoint stores 16-bit weights.
    pub fn is_half(self) -> bool {
        matches!(self, Self::StandardHalf | Self::SeparableHalf)
    }

    /// Side length the checkpoint was trained on.
    pub fn image_size(self) -> ImageSize {
        ImageSize(512)
    }
}

/// Compute device, selected once at process start and never reassigned.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// Host CPU.
    #[default]
    Cpu,
    /// CUDA accelerator.
    Cuda,
}

/// Acquire `device` and build the poser for `variant`.
///
/// This build links no accelerator runtime, so [`Device::Cuda`] always fails with
/// [`PosecastError::DeviceUnavailable`]. On CPU the built-in [`PassthroughPoser`] stands in for
/// the checkpoint.
#[tracing::instrument]
pub fn load_poser(variant: ModelVariant, device: Device) -> PosecastResult<Box<dyn Poser>> {
    match device {
        Device::Cpu => {
            tracing::info!(?variant, "using built-in passthrough poser on cpu");
            Ok(Box::new(PassthroughPoser::new(variant.image_size())))
        }
        Device::Cuda => Err(PosecastError::device_unavailable(
            "cuda requested but no accelerator runtime is linked into this build",
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/poser/backend.rs"]
mod tests;
