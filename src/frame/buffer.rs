use std::sync::{Arc, OnceLock};

use bytes::Bytes;
use parking_lot::RwLock;
use tokio::sync::watch;

use crate::{
    encode::png::encode_png,
    foundation::{
        core::{ChannelOrder, FrameSeq},
        error::PosecastResult,
    },
};

/// Interleaved 8-bit pixels of one rendered frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FramePixels {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Channel order of `data`.
    pub order: ChannelOrder,
    /// `width * height * 4` bytes, row-major.
    pub data: Vec<u8>,
}

/// An immutable published frame. The PNG encoding is computed on first request and shared by
/// every viewer.
#[derive(Debug)]
pub struct RenderedFrame {
    seq: FrameSeq,
    pixels: FramePixels,
    png: OnceLock<Bytes>,
}

impl RenderedFrame {
    /// Publish sequence number.
    pub fn seq(&self) -> FrameSeq {
        self.seq
    }

    /// Raw pixels.
    pub fn pixels(&self) -> &FramePixels {
        &self.pixels
    }

    /// PNG encoding of this frame, cached after the first call.
    pub fn encoded_png(&self) -> PosecastResult<Bytes> {
        if let Some(png) = self.png.get() {
            return Ok(png.clone());
        }
        let png = encode_png(&self.pixels)?;
        // A concurrent caller may have won the race; both encodings are identical.
        Ok(self.png.get_or_init(|| png).clone())
    }
}

/// Single-slot holder of the most recently published frame.
///
/// One writer (the render loop) replaces the slot wholesale; any number of readers take cheap
/// snapshots. Readers never observe a partially written frame, and sequence numbers strictly
/// increase across publishes. Async readers can [`subscribe`](Self::subscribe) to be woken on
/// every publish instead of polling.
#[derive(Debug)]
pub struct FrameBuffer {
    slot: RwLock<Option<Arc<RenderedFrame>>>,
    published: watch::Sender<Option<FrameSeq>>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self {
            slot: RwLock::new(None),
            published: watch::channel(None).0,
        }
    }
}

impl FrameBuffer {
    /// Empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Receiver that changes on every publish. The current value counts as seen.
    pub fn subscribe(&self) -> watch::Receiver<Option<FrameSeq>> {
        self.published.subscribe()
    }

    /// Replace the current frame and return the sequence number assigned to it.
    pub fn publish(&self, pixels: FramePixels) -> FrameSeq {
        let mut slot = self.slot.write();
        let seq = slot
            .as_ref()
            .map(|f| f.seq.next())
            .unwrap_or(FrameSeq(1));
        *slot = Some(Arc::new(RenderedFrame {
            seq,
            pixels,
            png: OnceLock::new(),
        }));
        drop(slot);
        self.published.send_replace(Some(seq));
        tracing::trace!(seq = seq.0, "frame published");
        seq
    }

    /// The latest frame, if any has been published.
    pub fn snapshot(&self) -> Option<Arc<RenderedFrame>> {
        self.slot.read().clone()
    }

    /// Sequence number of the latest frame.
    pub fn latest_seq(&self) -> Option<FrameSeq> {
        self.slot.read().as_ref().map(|f| f.seq)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/buffer.rs"]
mod tests;
