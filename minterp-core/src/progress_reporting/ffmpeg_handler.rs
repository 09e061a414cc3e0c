//! `FFmpeg` event handler for segment jobs
//!
//! Converts ffmpeg-sidecar events into `ProgressEvent`s for one segment and
//! keeps the error output needed to explain a failed job.

use crate::progress_reporting::{ProgressEvent, ProgressSender};
use crate::utils::parse_ffmpeg_time;
use ffmpeg_sidecar::event::{FfmpegEvent, FfmpegProgress, LogLevel as FfmpegLogLevel};

/// Number of error lines kept for failure messages.
const MAX_STDERR_LINES: usize = 20;

/// Handler for the `FFmpeg` events of a single segment job
pub struct FfmpegProgressHandler {
    segment_index: usize,
    duration: f64,
    sender: ProgressSender,
    last_reported_percent: f64,
    stderr_lines: Vec<String>,
}

impl FfmpegProgressHandler {
    /// Creates a handler for a segment of `duration` seconds.
    #[must_use]
    pub fn new(segment_index: usize, duration: f64, sender: ProgressSender) -> Self {
        Self {
            segment_index,
            duration,
            sender,
            last_reported_percent: -1.0,
            stderr_lines: Vec::new(),
        }
    }

    /// Handles an `FFmpeg` event
    pub fn handle_event(&mut self, event: FfmpegEvent) {
        match event {
            FfmpegEvent::Progress(progress) => self.handle_progress(&progress),
            FfmpegEvent::Log(level, message) => self.handle_log(&level, &message),
            FfmpegEvent::Error(error) => self.push_stderr(error),
            _ => {}
        }
    }

    /// The last error lines ffmpeg printed, newline separated.
    #[must_use]
    pub fn stderr_tail(&self) -> String {
        self.stderr_lines.join("\n")
    }

    /// Percentage of the segment covered by `time`, clamped to 0..=100.
    #[must_use]
    pub fn percent_for(&self, time: &str) -> f64 {
        let current_secs = parse_ffmpeg_time(time).unwrap_or(0.0);
        if self.duration > 0.0 {
            (current_secs / self.duration * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        }
    }

    fn handle_progress(&mut self, progress: &FfmpegProgress) {
        let percent = self.percent_for(&progress.time);
        if percent < self.last_reported_percent {
            return;
        }
        self.last_reported_percent = percent;
        self.sender.report(ProgressEvent {
            segment_index: self.segment_index,
            current_fps: progress.fps,
            percent,
        });
    }

    fn handle_log(&mut self, level: &FfmpegLogLevel, message: &str) {
        match level {
            FfmpegLogLevel::Fatal | FfmpegLogLevel::Error => {
                self.push_stderr(message.to_string());
            }
            FfmpegLogLevel::Warning => {
                log::debug!(target: "ffmpeg_log", "segment {}: {message}", self.segment_index);
            }
            _ => {
                log::trace!(target: "ffmpeg_log", "segment {}: {message}", self.segment_index);
            }
        }
    }

    fn push_stderr(&mut self, line: String) {
        log::debug!("ffmpeg segment {} stderr: {line}", self.segment_index);
        if self.stderr_lines.len() == MAX_STDERR_LINES {
            self.stderr_lines.remove(0);
        }
        self.stderr_lines.push(line);
    }
}
