use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    sync::{Arc, atomic::Ordering},
};

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    animation::driver::AnimationDriver,
    convert::converter::{PoseConverter, PoseVector},
    foundation::{
        core::{ChannelOrder, FrameSeq},
        error::PosecastError,
    },
    poser::{backend::Poser, output::tensor_to_pixels},
    session::{shared::Shared, state::LoopEvent},
};

/// What one tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The loop is not in the rendering state.
    Inactive,
    /// Rendering, but no source image is installed.
    NoSource,
    /// The pose vector did not change, so nothing was rendered.
    Skipped,
    /// A new frame was published.
    Published(FrameSeq),
    /// The poser failed; the previous frame stays current.
    Failed,
}

/// Owns the poser and performs ticks. Only the render thread (or a test) drives it.
pub(crate) struct RenderLoop {
    shared: Arc<Shared>,
    poser: Box<dyn Poser>,
    converter: Box<dyn PoseConverter>,
    driver: AnimationDriver,
    rng: StdRng,
    order: ChannelOrder,
    last_vector: Option<PoseVector>,
}

impl RenderLoop {
    pub(crate) fn new(
        shared: Arc<Shared>,
        poser: Box<dyn Poser>,
        converter: Box<dyn PoseConverter>,
        driver: AnimationDriver,
        seed: Option<u64>,
        order: ChannelOrder,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            shared,
            poser,
            converter,
            driver,
            rng,
            order,
            last_vector: None,
        }
    }

    /// Run one tick: animate, convert, skip-check, pose, publish.
    pub(crate) fn tick(&mut self) -> TickOutcome {
        let shared = Arc::clone(&self.shared);
        let _gate = shared.render_gate.lock();
        if !shared.loop_state().is_rendering() {
            return TickOutcome::Inactive;
        }
        shared.counters.ticks.fetch_add(1, Ordering::Relaxed);

        if shared.invalidate.swap(false, Ordering::SeqCst) {
            self.last_vector = None;
        }

        let pose = {
            let mut pose = shared.pose.lock();
            self.driver.tick(&mut pose, shared.talking(), &mut self.rng);
            pose.clone()
        };
        let vector = self.converter.convert(&pose);

        if self.last_vector.as_ref() == Some(&vector) {
            shared.counters.skipped.fetch_add(1, Ordering::Relaxed);
            return TickOutcome::Skipped;
        }

        let Some(source) = shared.source() else {
            return TickOutcome::NoSource;
        };

        let posed = catch_unwind(AssertUnwindSafe(|| self.poser.pose(&source.tensor, &vector)))
            .unwrap_or_else(|panic| Err(PosecastError::inference(panic_message(&*panic))));

        match posed {
            Ok(out) => {
                let pixels = tensor_to_pixels(&out, self.poser.output_range(), self.order);
                let seq = shared.frames.publish(pixels);
                self.last_vector = Some(vector);
                shared.counters.rendered.fetch_add(1, Ordering::Relaxed);
                if shared.pause_after_first_frame.swap(false, Ordering::SeqCst) {
                    shared.transition(LoopEvent::Pause);
                }
                TickOutcome::Published(seq)
            }
            Err(err) => {
                shared.counters.failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(error = %err, "inference failed, keeping previous frame");
                shared.record_error(&err);
                TickOutcome::Failed
            }
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("poser panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("poser panicked: {s}")
    } else {
        "poser panicked".to_string()
    }
}
