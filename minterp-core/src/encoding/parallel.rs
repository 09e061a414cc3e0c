//! Parallel execution of segment jobs.
//!
//! Every segment gets its own job on a dedicated rayon pool, so by default
//! all segments are interpolated at the same time. The first job that fails
//! raises the shared cancel flag; the remaining jobs kill their ffmpeg
//! processes and report `Cancelled`, and the dispatcher returns the error
//! that started the cascade.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, error, info};
use rayon::prelude::*;

use crate::config::PipelineConfig;
use crate::encoding::segmentation::Segment;
use crate::encoding::transcode::{JobContext, SegmentResult, SegmentTranscoder};
use crate::error::{CoreError, CoreResult};
use crate::external::ffmpeg_executor::FfmpegSpawner;
use crate::media::SourceMedia;
use crate::progress_reporting::ProgressSender;
use crate::temp_files::RunDirectory;

/// Runs one transcoding job per segment concurrently.
pub struct ParallelDispatcher<S: FfmpegSpawner> {
    transcoder: SegmentTranscoder<S>,
    config: PipelineConfig,
    progress: ProgressSender,
}

impl<S: FfmpegSpawner> ParallelDispatcher<S> {
    /// Create a new dispatcher
    pub fn new(spawner: S, config: &PipelineConfig) -> Self {
        Self {
            transcoder: SegmentTranscoder::new(spawner),
            config: config.clone(),
            progress: ProgressSender::disabled(),
        }
    }

    /// Set the channel progress events are published on
    pub fn with_progress(mut self, progress: ProgressSender) -> Self {
        self.progress = progress;
        self
    }

    /// Number of worker threads for `segment_count` jobs.
    pub fn worker_count(&self, segment_count: usize) -> usize {
        self.config
            .max_concurrent_jobs
            .unwrap_or(segment_count)
            .min(segment_count)
            .max(1)
    }

    /// Transcodes every segment and returns the results in segment order.
    ///
    /// # Errors
    ///
    /// Returns the first non-cancellation error any job produced. Outputs of
    /// jobs that did succeed are left in `run_dir`.
    pub fn run_all(
        &self,
        source: &SourceMedia,
        segments: &[Segment],
        run_dir: &RunDirectory,
    ) -> CoreResult<Vec<SegmentResult>> {
        if segments.is_empty() {
            return Ok(Vec::new());
        }

        let basename = source.basename()?;
        let workers = self.worker_count(segments.len());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("minterp-job-{i}"))
            .build()
            .map_err(|e| {
                CoreError::Io(std::io::Error::other(format!(
                    "failed to build worker pool: {e}"
                )))
            })?;

        info!(
            "Transcoding {} segments with {} concurrent jobs",
            segments.len(),
            workers
        );

        let ctx = JobContext {
            run_dir,
            basename: &basename,
            config: &self.config,
            cancel: Arc::new(AtomicBool::new(false)),
            progress: self.progress.clone(),
        };
        let first_error: Mutex<Option<CoreError>> = Mutex::new(None);

        let outcomes: Vec<Option<SegmentResult>> = pool.install(|| {
            segments
                .par_iter()
                .map(|segment| match self.transcoder.transcode(source, segment, &ctx) {
                    Ok(result) => Some(result),
                    Err(err) if err.is_cancellation() => None,
                    Err(err) => {
                        let mut slot = first_error.lock().unwrap_or_else(PoisonError::into_inner);
                        if slot.is_none() {
                            error!("{}; cancelling remaining segments", err);
                            *slot = Some(err);
                        } else {
                            debug!("Additional failure after cancellation: {}", err);
                        }
                        ctx.cancel();
                        None
                    }
                })
                .collect()
        });

        if let Some(err) = first_error
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
        {
            return Err(err);
        }

        // Cancellation only happens after an error is recorded, so every
        // outcome is present here.
        let results: Vec<SegmentResult> = outcomes.into_iter().flatten().collect();
        info!("All {} segments transcoded", results.len());
        Ok(results)
    }
}
