// ============================================================================
// minterp-core/src/encoding/transcode.rs
// ============================================================================
//
// SEGMENT TRANSCODER: Motion interpolation of a single segment
//
// Runs one ffmpeg `minterpolate` job for one segment of the source and reports
// its progress. Every launched process reaches exactly one terminal outcome:
// it is either waited on, or killed and then waited on.
//
// A job stops early when:
// - the shared cancel flag is set (a sibling job failed)
// - the optional per-job timeout elapses between two ffmpeg events
// - reading the ffmpeg event stream fails
//
// Any partial output file is removed when a job does not succeed.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::encoding::segmentation::Segment;
use crate::error::{CoreError, CoreResult, command_failed_message};
use crate::external::ffmpeg_builder::{InterpolateParams, build_interpolate_command};
use crate::external::ffmpeg_executor::{FfmpegProcess, FfmpegSpawner};
use crate::media::SourceMedia;
use crate::progress_reporting::{FfmpegProgressHandler, ProgressSender};
use crate::temp_files::RunDirectory;

/// A successfully processed segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentResult {
    /// Index of the segment this file was produced from
    pub index: usize,
    /// Path of the interpolated segment file
    pub path: PathBuf,
}

/// State shared by every job of one transcoding stage.
#[derive(Debug, Clone)]
pub struct JobContext<'a> {
    pub run_dir: &'a RunDirectory,
    /// File name of the source, used to name segment outputs
    pub basename: &'a str,
    pub config: &'a PipelineConfig,
    /// Set once any job fails; running jobs stop at their next event
    pub cancel: Arc<AtomicBool>,
    pub progress: ProgressSender,
}

impl JobContext<'_> {
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Asks every job sharing this context to stop.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }
}

/// Why a job stopped reading ffmpeg events before the stream ended.
#[derive(Debug)]
enum JobStop {
    Cancelled,
    TimedOut(Duration),
    Stream(String),
}

impl From<String> for JobStop {
    fn from(message: String) -> Self {
        JobStop::Stream(message)
    }
}

/// Runs the interpolation encode for single segments.
pub struct SegmentTranscoder<S: FfmpegSpawner> {
    spawner: S,
}

impl<S: FfmpegSpawner> SegmentTranscoder<S> {
    pub fn new(spawner: S) -> Self {
        Self { spawner }
    }

    /// Interpolates `segment` of `source` into the run directory.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Cancelled` when the job was stopped through the
    /// cancel flag, and `CoreError::Transcode` for every other failure.
    pub fn transcode(
        &self,
        source: &SourceMedia,
        segment: &Segment,
        ctx: &JobContext<'_>,
    ) -> CoreResult<SegmentResult> {
        let segment_index = segment.index;
        if ctx.is_cancelled() {
            debug!("Segment {} not started, stage already cancelled", segment_index);
            return Err(CoreError::Cancelled { segment_index });
        }

        let output_path = ctx.run_dir.segment_output_path(segment, ctx.basename);
        let params = InterpolateParams::for_segment(
            source.path(),
            &output_path,
            segment,
            ctx.config.target_fps,
            ctx.config.threads_per_job,
        );
        info!(
            "Segment {}: interpolating {:.3}s-{:.3}s to {} fps",
            segment_index, segment.start, segment.end, ctx.config.target_fps
        );

        let mut process = self.spawner.spawn(build_interpolate_command(&params)).map_err(
            |cause| {
                remove_partial_output(&output_path);
                CoreError::Transcode { segment_index, cause }
            },
        )?;

        let mut handler =
            FfmpegProgressHandler::new(segment_index, segment.duration(), ctx.progress.clone());
        let timeout = ctx.config.job_timeout;
        let started = Instant::now();

        let streamed = process.handle_events(|event| {
            if ctx.is_cancelled() {
                return Err(JobStop::Cancelled);
            }
            if let Some(limit) = timeout {
                if started.elapsed() > limit {
                    return Err(JobStop::TimedOut(limit));
                }
            }
            handler.handle_event(event);
            Ok(())
        });

        if let Err(stop) = streamed {
            stop_process(&mut process, segment_index);
            remove_partial_output(&output_path);
            return Err(match stop {
                JobStop::Cancelled => {
                    info!("Segment {} cancelled", segment_index);
                    CoreError::Cancelled { segment_index }
                }
                JobStop::TimedOut(limit) => CoreError::Transcode {
                    segment_index,
                    cause: format!("timed out after {:.1}s", limit.as_secs_f64()),
                },
                JobStop::Stream(cause) => CoreError::Transcode { segment_index, cause },
            });
        }

        let status = process.wait().map_err(|cause| {
            remove_partial_output(&output_path);
            CoreError::Transcode { segment_index, cause }
        })?;

        if !status.success() {
            remove_partial_output(&output_path);
            return Err(CoreError::Transcode {
                segment_index,
                cause: command_failed_message("ffmpeg", status, handler.stderr_tail()),
            });
        }

        info!(
            "Segment {} finished in {:.1}s",
            segment_index,
            started.elapsed().as_secs_f64()
        );
        Ok(SegmentResult {
            index: segment_index,
            path: output_path,
        })
    }
}

/// Kills a process that is being abandoned and reaps it.
fn stop_process<P: FfmpegProcess>(process: &mut P, segment_index: usize) {
    if let Err(e) = process.kill() {
        warn!("Segment {}: {}", segment_index, e);
    }
    if let Err(e) = process.wait() {
        warn!("Segment {}: {}", segment_index, e);
    }
}

fn remove_partial_output(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!("Removed partial output {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove partial output {}: {}", path.display(), e),
    }
}
