/// Render-loop state.
///
/// `Idle` means no character is loaded yet; `Paused` holds a source but renders nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopState {
    /// No source image.
    #[default]
    Idle,
    /// Source present, ticks do nothing.
    Paused,
    /// A load command is decoding its image.
    Loading,
    /// Each tick animates, converts and (maybe) renders.
    Rendering,
}

/// Inputs that move the render loop between [`LoopState`]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopEvent {
    /// A load command started.
    LoadStarted,
    /// The new source image is installed.
    Loaded,
    /// The image could not be decoded; the placeholder is installed.
    DecodeFailed,
    /// The image had no alpha. `has_source` tells whether an earlier source is still in place.
    AlphaRejected {
        /// A previous source image is retained.
        has_source: bool,
    },
    /// Pause command, or the one-shot pause after the first frame.
    Pause,
    /// Resume command.
    Resume,
}

impl LoopState {
    /// State after `event`. Events that make no sense in the current state leave it unchanged.
    pub fn on(self, event: LoopEvent) -> Self {
        use LoopEvent as E;
        match (self, event) {
            (_, E::LoadStarted) => Self::Loading,
            (Self::Loading, E::Loaded) => Self::Rendering,
            (Self::Loading, E::DecodeFailed) => Self::Paused,
            (Self::Loading, E::AlphaRejected { has_source: true }) => Self::Paused,
            (Self::Loading, E::AlphaRejected { has_source: false }) => Self::Idle,
            (Self::Rendering, E::Pause) => Self::Paused,
            (Self::Paused, E::Resume) => Self::Rendering,
            (state, _) => state,
        }
    }

    /// Whether ticks in this state do any work.
    pub fn is_rendering(self) -> bool {
        self == Self::Rendering
    }
}

/// [`LoopState`] plus a pause that arrived while a load was in flight.
///
/// A load always leaves `Loading` on its own, so a pause issued meanwhile is held back and applied
/// once the load settles. A resume issued meanwhile cancels it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct LoopControl {
    state: LoopState,
    pause_pending: bool,
}

impl LoopControl {
    pub(crate) fn state(self) -> LoopState {
        self.state
    }

    pub(crate) fn apply(&mut self, event: LoopEvent) -> LoopState {
        if self.state == LoopState::Loading {
            match event {
                LoopEvent::Pause => self.pause_pending = true,
                LoopEvent::Resume => self.pause_pending = false,
                _ => {}
            }
        }
        let mut next = self.state.on(event);
        if next != LoopState::Loading && std::mem::take(&mut self.pause_pending) {
            next = next.on(LoopEvent::Pause);
        }
        self.state = next;
        next
    }
}

/// Point-in-time view of the app for status reporting.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StatusSnapshot {
    /// Current loop state.
    pub state: LoopState,
    /// Talk override is on.
    pub talking: bool,
    /// External speaking signal is on.
    pub speaking: bool,
    /// A source image (character or placeholder) is installed.
    pub source_loaded: bool,
    /// Sequence number of the latest published frame.
    pub frame_seq: Option<u64>,
    /// Attached stream viewers.
    pub viewers: usize,
    /// Ticks run while rendering.
    pub ticks: u64,
    /// Frames published.
    pub frames_rendered: u64,
    /// Ticks skipped because the pose vector did not change.
    pub frames_skipped: u64,
    /// Poser failures.
    pub inference_failures: u64,
    /// Most recent recoverable error, cleared by the next successful load.
    pub last_error: Option<String>,
}

#[cfg(test)]
#[path = "../../tests/unit/session/state.rs"]
mod tests;
