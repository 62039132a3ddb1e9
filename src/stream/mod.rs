//! Fan-out of published frames to HTTP viewers as a multipart stream.

use std::{
    convert::Infallible,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use bytes::Bytes;
use tokio::sync::{mpsc, watch};
use tokio_stream::wrappers::ReceiverStream;

use crate::{
    encode::multipart::png_part,
    foundation::core::FrameSeq,
    frame::buffer::FrameBuffer,
};

/// Body chunks handed to one viewer.
pub type FrameStream = ReceiverStream<Result<Bytes, Infallible>>;

/// Serves the latest frame to any number of independent viewers.
///
/// Each viewer gets its own task and cursor and is woken by every publish. A viewer only receives
/// frames newer than the last one it saw, so a viewer whose client reads slower than the render
/// rate skips frames instead of queueing them. Nothing a viewer does can stall the render loop or
/// another viewer.
#[derive(Clone, Debug)]
pub struct StreamBroadcaster {
    frames: Arc<FrameBuffer>,
    idle: Duration,
    shutdown: watch::Receiver<bool>,
    viewers: Arc<AtomicUsize>,
}

impl StreamBroadcaster {
    /// Broadcaster over `frames`. Viewers wake on each publish and also re-check every `idle`.
    /// They end their stream once `shutdown` flips to `true`.
    pub fn new(frames: Arc<FrameBuffer>, idle: Duration, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            frames,
            idle,
            shutdown,
            viewers: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of currently attached viewers.
    pub fn viewer_count(&self) -> usize {
        self.viewers.load(Ordering::Relaxed)
    }

    /// Attach a new viewer. Must be called from within a tokio runtime.
    pub fn attach(&self) -> FrameStream {
        let (tx, rx) = mpsc::channel(1);
        let viewer = Viewer {
            published: self.frames.subscribe(),
            frames: Arc::clone(&self.frames),
            idle: self.idle,
            shutdown: self.shutdown.clone(),
            _guard: ViewerGuard::new(Arc::clone(&self.viewers)),
        };
        tokio::spawn(viewer.run(tx));
        ReceiverStream::new(rx)
    }
}

struct Viewer {
    frames: Arc<FrameBuffer>,
    published: watch::Receiver<Option<FrameSeq>>,
    idle: Duration,
    shutdown: watch::Receiver<bool>,
    _guard: ViewerGuard,
}

impl Viewer {
    async fn run(mut self, tx: mpsc::Sender<Result<Bytes, Infallible>>) {
        let mut last: Option<FrameSeq> = None;
        tracing::debug!("viewer attached");
        loop {
            if *self.shutdown.borrow() {
                break;
            }

            self.published.borrow_and_update();
            let fresh = self
                .frames
                .snapshot()
                .filter(|f| last.is_none_or(|seen| f.seq() > seen));

            if let Some(frame) = fresh {
                last = Some(frame.seq());
                let png = match frame.encoded_png() {
                    Ok(png) => png,
                    Err(err) => {
                        tracing::warn!(seq = frame.seq().0, error = %err, "frame encode failed, skipping");
                        continue;
                    }
                };
                if tx.send(Ok(png_part(&png))).await.is_err() {
                    break;
                }
                continue;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.idle) => {}
                _ = tx.closed() => break,
                published = self.published.changed() => {
                    if published.is_err() {
                        break;
                    }
                }
                changed = self.shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        tracing::debug!(last_seq = last.map(|s| s.0), "viewer detached");
    }
}

struct ViewerGuard(Arc<AtomicUsize>);

impl ViewerGuard {
    fn new(count: Arc<AtomicUsize>) -> Self {
        count.fetch_add(1, Ordering::Relaxed);
        Self(count)
    }
}

impl Drop for ViewerGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stream/mod.rs"]
mod tests;
