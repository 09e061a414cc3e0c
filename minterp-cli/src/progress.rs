// ============================================================================
// minterp-cli/src/progress.rs
// ============================================================================
//
// PROGRESS REPORTING: Terminal rendering of segment progress
//
// Segment jobs publish ProgressEvents on a channel. A dedicated thread drains
// that channel and renders one indicatif bar per segment on the MultiProgress
// shared with the logger. The thread ends once every sender is dropped, which
// happens when the pipeline returns.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use minterp_core::progress_reporting::ProgressEvent;
use std::sync::mpsc::Receiver;
use std::thread::JoinHandle;

const BAR_TEMPLATE: &str = "{prefix:>12} [{bar:40.cyan/blue}] {pos:>3}% {msg}";

/// Background renderer for per-segment progress bars.
pub struct SegmentProgressDisplay {
    handle: JoinHandle<()>,
}

impl SegmentProgressDisplay {
    /// Starts rendering `segment_count` bars on `multi` from `events`.
    pub fn spawn(
        multi: MultiProgress,
        segment_count: usize,
        events: Receiver<ProgressEvent>,
    ) -> Self {
        let handle = std::thread::spawn(move || render(&multi, segment_count, events));
        Self { handle }
    }

    /// Waits for the renderer to drain the channel and close its bars.
    pub fn finish(self) {
        if self.handle.join().is_err() {
            log::warn!("Progress display thread panicked");
        }
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

fn render(multi: &MultiProgress, segment_count: usize, events: Receiver<ProgressEvent>) {
    let style = bar_style();
    let bars: Vec<ProgressBar> = (0..segment_count)
        .map(|index| {
            let bar = multi.add(ProgressBar::new(100));
            bar.set_style(style.clone());
            bar.set_prefix(format!("segment {}", index + 1));
            bar
        })
        .collect();

    for event in events {
        if let Some(bar) = bars.get(event.segment_index) {
            bar.set_position(event.percent.round() as u64);
            bar.set_message(format!("{:.1} fps", event.current_fps));
        }
    }

    for bar in &bars {
        bar.finish();
    }
}
