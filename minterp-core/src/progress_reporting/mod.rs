//! Progress events emitted by segment jobs.
//!
//! Jobs publish `ProgressEvent`s on a `std::sync::mpsc` channel. Sending never
//! blocks and a disconnected receiver is ignored, so progress reporting can
//! never stall or fail a job.

pub mod ffmpeg_handler;

use std::sync::mpsc::{self, Receiver, Sender};

pub use ffmpeg_handler::FfmpegProgressHandler;

/// A progress update for one segment job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEvent {
    /// Segment the update belongs to
    pub segment_index: usize,
    /// Frames per second ffmpeg is currently processing
    pub current_fps: f32,
    /// Percentage of the segment processed, 0 to 100
    pub percent: f64,
}

/// Cloneable, best-effort handle for publishing progress.
#[derive(Debug, Clone, Default)]
pub struct ProgressSender {
    inner: Option<Sender<ProgressEvent>>,
}

impl ProgressSender {
    /// A sender that drops every event.
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    /// Publishes an event. Failures are ignored.
    pub fn report(&self, event: ProgressEvent) {
        if let Some(tx) = &self.inner {
            let _ = tx.send(event);
        }
    }
}

impl From<Sender<ProgressEvent>> for ProgressSender {
    fn from(tx: Sender<ProgressEvent>) -> Self {
        Self { inner: Some(tx) }
    }
}

/// Creates a connected progress sender/receiver pair.
pub fn progress_channel() -> (ProgressSender, Receiver<ProgressEvent>) {
    let (tx, rx) = mpsc::channel();
    (ProgressSender::from(tx), rx)
}
