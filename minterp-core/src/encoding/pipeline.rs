//! Pipeline orchestration
//!
//! Sequences the stages of a run: probe the source, plan segments,
//! interpolate every segment in parallel, then concatenate. A failing stage
//! ends the run; the concatenator never runs after an earlier failure.
//!
//! Scratch files of a run live in a fresh run directory that removes itself
//! when dropped. After a transcoding failure it is kept only when
//! `keep_temp` is set. After a concat failure it is always kept so the
//! segments can be inspected.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, error, info, warn};
use serde::Serialize;

use crate::config::PipelineConfig;
use crate::encoding::merger::SegmentMerger;
use crate::encoding::parallel::ParallelDispatcher;
use crate::encoding::segmentation::plan_segments;
use crate::error::{CoreError, CoreResult};
use crate::external::ffmpeg_executor::{FfmpegSpawner, SidecarSpawner};
use crate::external::ffprobe_executor::{CrateFfprobeExecutor, FfprobeExecutor};
use crate::media::SourceMedia;
use crate::progress_reporting::ProgressSender;
use crate::temp_files::RunDirectory;
use crate::utils::format_duration;

/// Stage a pipeline run is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineStage {
    Idle,
    Probing,
    Planning,
    Transcoding,
    Concatenating,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Probing => "probing",
            PipelineStage::Planning => "planning",
            PipelineStage::Transcoding => "transcoding",
            PipelineStage::Concatenating => "concatenating",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    /// The `processed-<basename>` file
    pub output_path: PathBuf,
    pub source: SourceMedia,
    pub segment_count: usize,
    /// Wall-clock time of the whole run in seconds
    pub elapsed_secs: f64,
}

/// Runs the full interpolation pipeline for one source at a time.
pub struct Pipeline<S: FfmpegSpawner + Clone, P: FfprobeExecutor> {
    config: PipelineConfig,
    spawner: S,
    prober: P,
    progress: ProgressSender,
    stage: PipelineStage,
}

impl<S: FfmpegSpawner + Clone, P: FfprobeExecutor> Pipeline<S, P> {
    pub fn new(config: PipelineConfig, spawner: S, prober: P) -> Self {
        Self {
            config,
            spawner,
            prober,
            progress: ProgressSender::disabled(),
            stage: PipelineStage::Idle,
        }
    }

    /// Set the channel segment progress is published on
    pub fn with_progress(mut self, progress: ProgressSender) -> Self {
        self.progress = progress;
        self
    }

    /// Stage the last run reached.
    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Processes `source` and returns where the result was written.
    ///
    /// # Errors
    ///
    /// Returns the error of the first stage that failed.
    pub fn run(&mut self, source: &Path) -> CoreResult<PipelineOutput> {
        self.stage = PipelineStage::Idle;
        let started = Instant::now();
        match self.run_stages(source, started) {
            Ok(output) => {
                self.enter(PipelineStage::Done);
                info!(
                    "Finished {} in {}",
                    output.output_path.display(),
                    format_duration(output.elapsed_secs)
                );
                Ok(output)
            }
            Err(err) => {
                error!("Pipeline failed during {}: {}", self.stage, err);
                self.enter(PipelineStage::Failed);
                Err(err)
            }
        }
    }

    fn run_stages(&mut self, source: &Path, started: Instant) -> CoreResult<PipelineOutput> {
        self.config.validate()?;

        self.enter(PipelineStage::Probing);
        let source_path = std::fs::canonicalize(source).map_err(|e| {
            CoreError::Probe(format!("cannot resolve {}: {}", source.display(), e))
        })?;
        let media = self.prober.probe(&source_path)?;
        info!(
            "Source {}: {} ({} {}x{}, {})",
            media.path.display(),
            format_duration(media.duration_secs),
            media.video_codec.as_deref().unwrap_or("unknown codec"),
            media.width.unwrap_or(0),
            media.height.unwrap_or(0),
            media.format_name.as_deref().unwrap_or("unknown format"),
        );

        self.enter(PipelineStage::Planning);
        let segments = plan_segments(media.duration_secs, self.config.segment_count)?;

        self.enter(PipelineStage::Transcoding);
        let run_dir = RunDirectory::create(&self.config.effective_work_dir())?;
        let dispatcher = ParallelDispatcher::new(self.spawner.clone(), &self.config)
            .with_progress(self.progress.clone());
        let results = match dispatcher.run_all(&media, &segments, &run_dir) {
            Ok(results) => results,
            Err(err) => {
                if self.config.keep_temp {
                    info!("Keeping segment files in {}", run_dir.keep().display());
                }
                return Err(err);
            }
        };

        self.enter(PipelineStage::Concatenating);
        let merger = SegmentMerger::new(self.spawner.clone());
        let output_path = match merger.concat(
            &media,
            &results,
            &run_dir,
            &self.config.effective_output_dir(),
        ) {
            Ok(path) => path,
            Err(err) => {
                let kept = run_dir.keep();
                debug!("Run directory {} kept after concat failure", kept.display());
                return Err(err);
            }
        };

        let run_dir_path = run_dir.path().to_path_buf();
        if let Err(e) = run_dir.close() {
            warn!(
                "Failed to remove run directory {}: {}",
                run_dir_path.display(),
                e
            );
        }

        Ok(PipelineOutput {
            output_path,
            segment_count: segments.len(),
            source: media,
            elapsed_secs: started.elapsed().as_secs_f64(),
        })
    }

    fn enter(&mut self, stage: PipelineStage) {
        debug!("Pipeline stage: {} -> {}", self.stage, stage);
        self.stage = stage;
    }
}

/// Runs the pipeline with the ffmpeg-sidecar and ffprobe implementations.
pub fn run_pipeline(
    source: &Path,
    config: &PipelineConfig,
    progress: ProgressSender,
) -> CoreResult<PipelineOutput> {
    Pipeline::new(config.clone(), SidecarSpawner, CrateFfprobeExecutor::new())
        .with_progress(progress)
        .run(source)
}
