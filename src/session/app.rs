use std::{
    path::{Path, PathBuf},
    sync::{Arc, atomic::Ordering},
    time::Duration,
};

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::{
    animation::driver::AnimationDriver,
    assets::source::{SourceImage, SourceImageLoader},
    config::AppConfig,
    convert::converter::StandardPoseConverter,
    foundation::error::{PosecastError, PosecastResult},
    frame::buffer::{FrameBuffer, RenderedFrame},
    pose::{
        emotion::{Emotion, apply_emotion},
        state::{ParamValue, PoseState},
    },
    poser::backend::{Poser, load_poser},
    session::{
        render_loop::{RenderLoop, TickOutcome},
        scheduler::FixedRateScheduler,
        shared::Shared,
        state::{LoopEvent, LoopState, StatusSnapshot},
    },
    stream::StreamBroadcaster,
};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// The running avatar: pose, source image, render loop and frame fan-out behind one command
/// interface.
///
/// Commands may be issued from any thread. Animation, conversion and inference happen only on the
/// render thread started by [`App::start`] (or in [`App::step`] for manual driving).
pub struct App {
    shared: Arc<Shared>,
    render: Arc<Mutex<RenderLoop>>,
    loader: SourceImageLoader,
    placeholder_path: Option<PathBuf>,
    broadcaster: StreamBroadcaster,
    shutdown_tx: watch::Sender<bool>,
    scheduler: Mutex<Option<FixedRateScheduler>>,
    tick_interval: Duration,
    upload_limit: usize,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("state", &self.shared.loop_state())
            .field("tick_interval", &self.tick_interval)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Acquire the configured device and model, then build the app. Fails with
    /// [`PosecastError::DeviceUnavailable`] when the device cannot be used.
    pub fn from_config(config: &AppConfig) -> PosecastResult<Self> {
        let poser = load_poser(config.model, config.device)?;
        Self::new(config, poser)
    }

    /// Build the app around an explicit poser. The render loop is not started.
    #[tracing::instrument(skip_all)]
    pub fn new(config: &AppConfig, poser: Box<dyn Poser>) -> PosecastResult<Self> {
        config.validate()?;

        let frames = Arc::new(FrameBuffer::new());
        let shared = Arc::new(Shared {
            frames: Arc::clone(&frames),
            ..Shared::default()
        });
        shared
            .pause_after_first_frame
            .store(config.start_paused, Ordering::SeqCst);

        let loader = SourceImageLoader::new(poser.image_size());
        let render = RenderLoop::new(
            Arc::clone(&shared),
            poser,
            Box::new(StandardPoseConverter::new(config.converter)),
            AnimationDriver::new(config.driver),
            config.seed,
            config.frame_order,
        );

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let broadcaster = StreamBroadcaster::new(frames, config.stream_idle(), shutdown_rx);

        tracing::info!(
            side = loader.size().0,
            tick_ms = config.tick_interval_ms,
            seed = config.seed,
            start_paused = config.start_paused,
            "app ready"
        );

        Ok(Self {
            shared,
            render: Arc::new(Mutex::new(render)),
            loader,
            placeholder_path: config.placeholder.clone(),
            broadcaster,
            shutdown_tx,
            scheduler: Mutex::new(None),
            tick_interval: config.tick_interval(),
            upload_limit: config.max_upload_bytes,
        })
    }

    /// Start the periodic render thread. Calling it again while running does nothing.
    pub fn start(&self) -> PosecastResult<()> {
        let mut slot = self.scheduler.lock();
        if slot.as_ref().is_some_and(FixedRateScheduler::is_running) {
            return Ok(());
        }
        let render = Arc::clone(&self.render);
        *slot = Some(FixedRateScheduler::start(
            "posecast-render",
            self.tick_interval,
            move || {
                render.lock().tick();
            },
        )?);
        Ok(())
    }

    /// Run a single tick on the calling thread.
    pub fn step(&self) -> TickOutcome {
        self.render.lock().tick()
    }

    /// Stop the render thread and end every stream.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(mut scheduler) = self.scheduler.lock().take() {
            scheduler.stop(SHUTDOWN_GRACE);
        }
        tracing::info!("app shut down");
    }

    /// Load a character from encoded image bytes.
    pub fn load_bytes(&self, bytes: &[u8]) -> PosecastResult<()> {
        self.load_with(|loader| loader.load_bytes(bytes))
    }

    /// Load a character from an image file.
    pub fn load_path(&self, path: &Path) -> PosecastResult<()> {
        self.load_with(|loader| loader.load_path(path))
    }

    fn load_with(
        &self,
        load: impl FnOnce(&SourceImageLoader) -> PosecastResult<SourceImage>,
    ) -> PosecastResult<()> {
        let had_source = {
            let _gate = self.shared.render_gate.lock();
            self.shared.transition(LoopEvent::LoadStarted);
            self.shared.source().is_some()
        };

        let result = load(&self.loader);

        let _gate = self.shared.render_gate.lock();
        match result {
            Ok(src) => {
                self.shared.install_source(src);
                self.shared.clear_error();
                self.shared.transition(LoopEvent::Loaded);
                Ok(())
            }
            Err(PosecastError::MissingAlphaChannel) => {
                let err = PosecastError::MissingAlphaChannel;
                tracing::warn!(error = %err, "rejected character image");
                self.shared.record_error(&err);
                self.shared.transition(LoopEvent::AlphaRejected {
                    has_source: had_source,
                });
                Err(err)
            }
            Err(err) => {
                tracing::warn!(error = %err, "character image unusable, showing placeholder");
                self.shared.record_error(&err);
                match self.placeholder() {
                    Ok(placeholder) => self.shared.install_source(placeholder),
                    Err(p_err) => tracing::error!(error = %p_err, "placeholder unavailable"),
                }
                self.shared.transition(LoopEvent::DecodeFailed);
                Err(err)
            }
        }
    }

    fn placeholder(&self) -> PosecastResult<SourceImage> {
        if let Some(path) = &self.placeholder_path {
            match self.loader.load_path(path) {
                Ok(src) => return Ok(src),
                Err(err) => tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "configured placeholder unusable, using built-in"
                ),
            }
        }
        self.loader.placeholder()
    }

    /// Stop rendering; the last frame stays readable. During a load the pause takes effect once
    /// the load finishes.
    pub fn pause(&self) -> LoopState {
        let _gate = self.shared.render_gate.lock();
        self.shared.transition(LoopEvent::Pause)
    }

    /// Continue rendering from the current pose. Does nothing without a source.
    pub fn resume(&self) -> LoopState {
        let _gate = self.shared.render_gate.lock();
        self.shared.transition(LoopEvent::Resume)
    }

    /// Turn the talk override on.
    pub fn start_talking(&self) {
        self.shared.talking.store(true, Ordering::Relaxed);
    }

    /// Turn the talk override off. The external speaking signal is unaffected.
    pub fn stop_talking(&self) {
        self.shared.talking.store(false, Ordering::Relaxed);
    }

    /// External speaking signal (e.g. from a speech synthesizer).
    pub fn set_speaking(&self, speaking: bool) {
        self.shared.speaking.store(speaking, Ordering::Relaxed);
    }

    /// Replace the pose with a named preset. Unknown names leave the pose unchanged.
    pub fn apply_emotion(&self, name: &str) -> Option<Emotion> {
        let applied = apply_emotion(&mut self.shared.pose.lock(), name);
        match applied {
            Some(emotion) => tracing::debug!(emotion = emotion.name(), "emotion applied"),
            None => tracing::debug!(name, "unknown emotion ignored"),
        }
        applied
    }

    /// Override one named pose parameter.
    pub fn set_param(&self, name: &str, value: ParamValue) -> PosecastResult<()> {
        self.shared.pose.lock().set_named(name, value)
    }

    /// Copy of the current pose.
    pub fn pose(&self) -> PoseState {
        self.shared.pose.lock().clone()
    }

    /// Current loop state.
    pub fn state(&self) -> LoopState {
        self.shared.loop_state()
    }

    /// Status for display.
    pub fn status(&self) -> StatusSnapshot {
        let c = &self.shared.counters;
        StatusSnapshot {
            state: self.shared.loop_state(),
            talking: self.shared.talking.load(Ordering::Relaxed),
            speaking: self.shared.speaking.load(Ordering::Relaxed),
            source_loaded: self.shared.source().is_some(),
            frame_seq: self.shared.frames.latest_seq().map(|s| s.0),
            viewers: self.broadcaster.viewer_count(),
            ticks: c.ticks.load(Ordering::Relaxed),
            frames_rendered: c.rendered.load(Ordering::Relaxed),
            frames_skipped: c.skipped.load(Ordering::Relaxed),
            inference_failures: c.failures.load(Ordering::Relaxed),
            last_error: self.shared.last_error.lock().clone(),
        }
    }

    /// Latest published frame.
    pub fn latest_frame(&self) -> Option<Arc<RenderedFrame>> {
        self.shared.frames.snapshot()
    }

    /// The frame buffer the render loop publishes into.
    pub fn frames(&self) -> Arc<FrameBuffer> {
        Arc::clone(&self.shared.frames)
    }

    /// Largest accepted character upload, in bytes.
    pub fn upload_limit(&self) -> usize {
        self.upload_limit
    }

    /// Fan-out for stream viewers.
    pub fn broadcaster(&self) -> &StreamBroadcaster {
        &self.broadcaster
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(mut scheduler) = self.scheduler.lock().take() {
            let _ = self.shutdown_tx.send(true);
            scheduler.stop(SHUTDOWN_GRACE);
        }
    }
}
