/// Convenience result type used across posecast.
pub type PosecastResult<T> = Result<T, PosecastError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Only [`PosecastError::DeviceUnavailable`] is fatal, and only before the render loop starts.
/// Everything raised per tick is logged at the render-loop boundary and surfaced through the
/// status snapshot.
#[derive(thiserror::Error, Debug)]
pub enum PosecastError {
    /// Input bytes (or the file behind a path) could not be decoded as an image.
    #[error("image decode error: {0}")]
    ImageDecode(String),

    /// The image decoded fine but carries no alpha channel.
    #[error("image must have an alpha channel")]
    MissingAlphaChannel,

    /// The poser failed (returned an error or panicked) while rendering a frame.
    #[error("inference error: {0}")]
    Inference(String),

    /// The requested compute device cannot be acquired.
    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),

    /// A pose parameter name outside the fixed schema.
    #[error("unknown pose parameter \"{0}\"")]
    UnknownParameter(String),

    /// Invalid user-provided command or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PosecastError {
    /// Build a [`PosecastError::ImageDecode`] value.
    pub fn image_decode(msg: impl Into<String>) -> Self {
        Self::ImageDecode(msg.into())
    }

    /// Build a [`PosecastError::Inference`] value.
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Build a [`PosecastError::DeviceUnavailable`] value.
    pub fn device_unavailable(msg: impl Into<String>) -> Self {
        Self::DeviceUnavailable(msg.into())
    }

    /// Build a [`PosecastError::UnknownParameter`] value.
    pub fn unknown_parameter(name: impl Into<String>) -> Self {
        Self::UnknownParameter(name.into())
    }

    /// Build a [`PosecastError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether the render loop may continue after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::DeviceUnavailable(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
