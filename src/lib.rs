//! posecast drives a parameterized 2D character avatar and streams it live.
//!
//! A named facial pose is animated procedurally every tick, converted into the fixed numeric
//! vector a neural posing model expects, rendered against a character image and published as the
//! latest frame. Any number of HTTP viewers read that frame as a `multipart/x-mixed-replace` PNG
//! stream.
//!
//! # Pipeline overview
//!
//! 1. **Animate**: [`AnimationDriver`] mutates the shared [`PoseState`] (blink, head sway, jaw)
//! 2. **Convert**: [`PoseConverter`] maps the pose to a [`PoseVector`]
//! 3. **Pose**: a [`Poser`] renders the [`SourceImage`] under that vector (skipped when the
//!    vector is unchanged)
//! 4. **Publish**: the output lands in the [`FrameBuffer`]; [`StreamBroadcaster`] fans it out
//!
//! Everything is owned by one [`App`], which also exposes the command interface used by the
//! HTTP surface in [`build_router`].
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-seed**: with a fixed RNG seed, pose sequences are byte-identical.
//! - **Single inference owner**: only the render thread calls the poser.
//! - **Straight RGBA8** frames, sRGB encoded.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod assets;
mod config;
mod convert;
mod encode;
mod foundation;
mod frame;
mod pose;
mod poser;
mod server;
mod session;
mod stream;

pub use animation::driver::{AnimationDriver, DriverOpts, TickReport};
pub use assets::source::{SourceImage, SourceImageLoader, resize_and_pad};
pub use config::AppConfig;
pub use convert::converter::{
    ConverterOpts, EyebrowDownMode, PoseConverter, PoseVector, StandardPoseConverter, WinkMode,
};
pub use convert::layout::{POSE_VECTOR_LEN, PoseChannel};
pub use encode::multipart::{
    BOUNDARY as MULTIPART_BOUNDARY, CONTENT_TYPE as MULTIPART_CONTENT_TYPE, frame_part, png_part,
};
pub use encode::png::encode_png;
pub use foundation::color::{linear_to_srgb, srgb_to_linear, unit_to_u8};
pub use foundation::core::{ChannelOrder, FrameSeq, ImageSize};
pub use foundation::error::{PosecastError, PosecastResult};
pub use frame::buffer::{FrameBuffer, FramePixels, RenderedFrame};
pub use pose::emotion::{Emotion, apply_emotion};
pub use pose::state::{Axis, Blendshape, Bone, POSE_PARAM_COUNT, ParamValue, PoseParam, PoseState};
pub use poser::backend::{Device, ModelVariant, Poser, load_poser};
pub use poser::output::tensor_to_pixels;
pub use poser::passthrough::PassthroughPoser;
pub use poser::tensor::{ImageTensor, OutputRange, TENSOR_CHANNELS};
pub use server::build_router;
pub use session::app::App;
pub use session::render_loop::TickOutcome;
pub use session::scheduler::FixedRateScheduler;
pub use session::state::{LoopEvent, LoopState, StatusSnapshot};
pub use stream::{FrameStream, StreamBroadcaster};
