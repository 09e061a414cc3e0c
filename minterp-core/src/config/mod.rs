//! Configuration structures and constants for the minterp-core library.
//!
//! This module provides the configuration that controls how a source file is
//! split, how each segment is interpolated, and where scratch and output files
//! are written.

mod builder;

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CoreError, CoreResult};

pub use builder::PipelineConfigBuilder;

// Default constants

/// Default number of segments a source is split into.
pub const DEFAULT_SEGMENT_COUNT: usize = 5;

/// Default frame rate targeted by the `minterpolate` filter.
pub const DEFAULT_TARGET_FPS: u32 = 60;

/// Default `-threads` hint passed to each ffmpeg segment job.
/// Kept low because every segment runs at the same time.
pub const DEFAULT_THREADS_PER_JOB: u32 = 2;

/// Main configuration structure for the minterp pipeline.
///
/// All fields have defaults, so a bare `PipelineConfig::default()` reproduces
/// the classic behaviour: five segments, 60 fps, two threads per job, scratch
/// and output in the system temp directory.
///
/// # Examples
///
/// ```rust
/// use minterp_core::config::PipelineConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = PipelineConfigBuilder::new()
///     .segment_count(8)
///     .target_fps(120)
///     .work_dir(PathBuf::from("/tmp/minterp"))
///     .build();
/// assert_eq!(config.segment_count, 8);
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Number of equal-length segments the source is split into
    pub segment_count: usize,

    /// Output frame rate for motion interpolation
    pub target_fps: u32,

    /// ffmpeg `-threads` hint for each segment job
    pub threads_per_job: u32,

    /// Base directory for per-run scratch files (defaults to the system temp dir)
    pub work_dir: Option<PathBuf>,

    /// Directory for the final output (defaults to the work dir)
    pub output_dir: Option<PathBuf>,

    /// Optional wall-clock limit for a single segment job
    pub job_timeout: Option<Duration>,

    /// Optional cap on concurrently running jobs (defaults to the segment count)
    pub max_concurrent_jobs: Option<usize>,

    /// Keep segment files after a failed transcoding stage
    pub keep_temp: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            segment_count: DEFAULT_SEGMENT_COUNT,
            target_fps: DEFAULT_TARGET_FPS,
            threads_per_job: DEFAULT_THREADS_PER_JOB,
            work_dir: None,
            output_dir: None,
            job_timeout: None,
            max_concurrent_jobs: None,
            keep_temp: false,
        }
    }
}

impl PipelineConfig {
    /// Directory under which run scratch directories are created.
    pub fn effective_work_dir(&self) -> PathBuf {
        self.work_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Directory the final `processed-*` file is written to.
    pub fn effective_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.effective_work_dir())
    }

    /// Checks the configuration for values the pipeline cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.segment_count == 0 {
            return Err(CoreError::Config(
                "segment count must be at least 1".to_string(),
            ));
        }
        if self.target_fps == 0 {
            return Err(CoreError::Config(
                "target frame rate must be at least 1".to_string(),
            ));
        }
        if self.threads_per_job == 0 {
            return Err(CoreError::Config(
                "threads per job must be at least 1".to_string(),
            ));
        }
        if self.max_concurrent_jobs == Some(0) {
            return Err(CoreError::Config(
                "max concurrent jobs must be at least 1".to_string(),
            ));
        }
        if self.job_timeout == Some(Duration::ZERO) {
            return Err(CoreError::Config(
                "job timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
