use std::{
    sync::mpsc,
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use anyhow::Context;

use crate::foundation::error::PosecastResult;

const JOIN_POLL: Duration = Duration::from_millis(5);

/// Runs a task at a fixed period on a dedicated named OS thread.
///
/// A tick that overruns its slot is not followed by a burst of catch-up ticks; the schedule
/// restarts from the late tick. Dropping the scheduler stops it with a zero grace period.
#[derive(Debug)]
pub struct FixedRateScheduler {
    stop_tx: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl FixedRateScheduler {
    /// Start calling `task` every `period`. The first call happens immediately.
    pub fn start<F>(name: &str, period: Duration, mut task: F) -> PosecastResult<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let mut next = Instant::now();
                loop {
                    task();
                    next += period;
                    let now = Instant::now();
                    if next < now {
                        next = now;
                    }
                    match stop_rx.recv_timeout(next - now) {
                        Err(mpsc::RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
                    }
                }
            })
            .with_context(|| format!("spawn scheduler thread '{name}'"))?;
        tracing::debug!(name, period_ms = period.as_millis() as u64, "scheduler started");
        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Whether the worker thread is still alive.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop scheduling. Waits up to `grace` for an in-flight tick to finish, then detaches the
    /// thread. Returns `true` if the thread exited within the grace period.
    pub fn stop(&mut self, grace: Duration) -> bool {
        drop(self.stop_tx.take());
        let Some(handle) = self.handle.take() else {
            return true;
        };
        let deadline = Instant::now() + grace;
        while !handle.is_finished() {
            if Instant::now() >= deadline {
                tracing::warn!(
                    grace_ms = grace.as_millis() as u64,
                    "scheduler tick still running after grace period, detaching"
                );
                return false;
            }
            thread::sleep(JOIN_POLL);
        }
        if handle.join().is_err() {
            tracing::warn!("scheduler thread panicked");
        }
        true
    }
}

impl Drop for FixedRateScheduler {
    fn drop(&mut self) {
        self.stop(Duration::ZERO);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/scheduler.rs"]
mod tests;
