// ============================================================================
// minterp-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for PipelineConfig
//
// Provides a fluent API for assembling a PipelineConfig from CLI flags or
// library callers, starting from the crate defaults.

use std::path::PathBuf;
use std::time::Duration;

use super::PipelineConfig;

/// Builder for creating PipelineConfig instances.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Creates a builder holding the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of segments.
    pub fn segment_count(mut self, count: usize) -> Self {
        self.config.segment_count = count;
        self
    }

    /// Sets the interpolation target frame rate.
    pub fn target_fps(mut self, fps: u32) -> Self {
        self.config.target_fps = fps;
        self
    }

    /// Sets the ffmpeg thread hint per segment job.
    pub fn threads_per_job(mut self, threads: u32) -> Self {
        self.config.threads_per_job = threads;
        self
    }

    /// Sets the base directory for scratch files.
    pub fn work_dir(mut self, dir: PathBuf) -> Self {
        self.config.work_dir = Some(dir);
        self
    }

    /// Sets the directory for the final output file.
    pub fn output_dir(mut self, dir: PathBuf) -> Self {
        self.config.output_dir = Some(dir);
        self
    }

    /// Sets a per-job timeout.
    pub fn job_timeout(mut self, timeout: Duration) -> Self {
        self.config.job_timeout = Some(timeout);
        self
    }

    /// Caps the number of jobs running at once.
    pub fn max_concurrent_jobs(mut self, jobs: usize) -> Self {
        self.config.max_concurrent_jobs = Some(jobs);
        self
    }

    /// Keeps segment files when transcoding fails.
    pub fn keep_temp(mut self, keep: bool) -> Self {
        self.config.keep_temp = keep;
        self
    }

    /// Builds the PipelineConfig.
    pub fn build(self) -> PipelineConfig {
        self.config
    }
}
