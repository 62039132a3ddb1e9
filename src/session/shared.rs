use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use parking_lot::{Mutex, RwLock};

use crate::{
    assets::source::SourceImage,
    foundation::error::PosecastError,
    frame::buffer::FrameBuffer,
    pose::state::PoseState,
    session::state::{LoopControl, LoopEvent, LoopState},
};

/// State shared between the command side and the render thread.
#[derive(Debug, Default)]
pub(crate) struct Shared {
    pub(crate) pose: Mutex<PoseState>,
    pub(crate) source: RwLock<Option<Arc<SourceImage>>>,
    pub(crate) state: Mutex<LoopControl>,
    /// Held for a whole tick, so commands that take it never interleave with a render.
    pub(crate) render_gate: Mutex<()>,
    pub(crate) talking: AtomicBool,
    pub(crate) speaking: AtomicBool,
    pub(crate) invalidate: AtomicBool,
    pub(crate) pause_after_first_frame: AtomicBool,
    pub(crate) frames: Arc<FrameBuffer>,
    pub(crate) last_error: Mutex<Option<String>>,
    pub(crate) counters: Counters,
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub(crate) ticks: AtomicU64,
    pub(crate) rendered: AtomicU64,
    pub(crate) skipped: AtomicU64,
    pub(crate) failures: AtomicU64,
}

impl Shared {
    pub(crate) fn loop_state(&self) -> LoopState {
        self.state.lock().state()
    }

    pub(crate) fn transition(&self, event: LoopEvent) -> LoopState {
        let mut control = self.state.lock();
        let from = control.state();
        let next = control.apply(event);
        if next != from {
            tracing::info!(?from, to = ?next, ?event, "render loop state changed");
        }
        next
    }

    pub(crate) fn source(&self) -> Option<Arc<SourceImage>> {
        self.source.read().clone()
    }

    pub(crate) fn install_source(&self, src: SourceImage) {
        *self.source.write() = Some(Arc::new(src));
        self.invalidate.store(true, Ordering::SeqCst);
    }

    pub(crate) fn talking(&self) -> bool {
        self.talking.load(Ordering::Relaxed) || self.speaking.load(Ordering::Relaxed)
    }

    pub(crate) fn record_error(&self, err: &PosecastError) {
        *self.last_error.lock() = Some(err.to_string());
    }

    pub(crate) fn clear_error(&self) {
        *self.last_error.lock() = None;
    }
}
