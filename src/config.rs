use std::{
    fs::File,
    io::BufReader,
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    animation::driver::DriverOpts,
    convert::converter::ConverterOpts,
    foundation::{
        core::ChannelOrder,
        error::{PosecastError, PosecastResult},
    },
    poser::backend::{Device, ModelVariant},
};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Process-start configuration. Immutable once the app is built.
///
/// Every field has a default, so a JSON config file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Checkpoint flavour.
    pub model: ModelVariant,
    /// Compute device.
    pub device: Device,
    /// HTTP listen address.
    pub listen: SocketAddr,
    /// Render-loop period in milliseconds.
    pub tick_interval_ms: u64,
    /// How long a stream viewer waits before re-checking for a new frame, in milliseconds.
    pub stream_idle_ms: u64,
    /// Seed for the animation RNG. Unset means seeded from OS entropy.
    pub seed: Option<u64>,
    /// Character image loaded at startup.
    pub initial_image: Option<PathBuf>,
    /// Image shown when a load fails to decode. Unset means a generated silhouette.
    pub placeholder: Option<PathBuf>,
    /// Pause the loop after the first frame is published.
    pub start_paused: bool,
    /// Channel order of published frames.
    pub frame_order: ChannelOrder,
    /// Pose-vector conversion options.
    pub converter: ConverterOpts,
    /// Procedural animation options.
    pub driver: DriverOpts,
    /// Largest accepted body for an uploaded character image, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: ModelVariant::default(),
            device: Device::default(),
            listen: SocketAddr::from(([127, 0, 0, 1], 8080)),
            tick_interval_ms: 100,
            stream_idle_ms: 100,
            seed: None,
            initial_image: None,
            placeholder: None,
            start_paused: false,
            frame_order: ChannelOrder::default(),
            converter: ConverterOpts::default(),
            driver: DriverOpts::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl AppConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> PosecastResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| PosecastError::validation(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> PosecastResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PosecastError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject values the render loop cannot run with.
    pub fn validate(&self) -> PosecastResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(PosecastError::validation("tick_interval_ms must be > 0"));
        }
        if self.stream_idle_ms == 0 {
            return Err(PosecastError::validation("stream_idle_ms must be > 0"));
        }
        if self.max_upload_bytes == 0 {
            return Err(PosecastError::validation("max_upload_bytes must be > 0"));
        }
        let p = self.driver.blink_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(PosecastError::validation(format!(
                "driver.blink_probability must be within [0, 1], got {p}"
            )));
        }
        if self.driver.step_scale <= 0.0 || !self.driver.step_scale.is_finite() {
            return Err(PosecastError::validation("driver.step_scale must be > 0"));
        }
        Ok(())
    }

    /// Render-loop period.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Viewer re-check interval.
    pub fn stream_idle(&self) -> Duration {
        Duration::from_millis(self.stream_idle_ms)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
