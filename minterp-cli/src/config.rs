// minterp-cli/src/config.rs
//
// Maps parsed CLI arguments onto the core pipeline configuration.

use crate::cli::Cli;
use minterp_core::config::{PipelineConfig, PipelineConfigBuilder};
use std::time::Duration;

/// Builds the `PipelineConfig` for a run. `--outdir` holds both the run's
/// scratch directory and the final output.
pub fn build_pipeline_config(args: &Cli) -> PipelineConfig {
    let mut builder = PipelineConfigBuilder::new()
        .segment_count(args.segments as usize)
        .target_fps(args.fps)
        .threads_per_job(args.threads)
        .keep_temp(args.keep_temp);

    if let Some(dir) = &args.outdir {
        builder = builder.work_dir(dir.clone()).output_dir(dir.clone());
    }
    if let Some(secs) = args.timeout {
        builder = builder.job_timeout(Duration::from_secs(secs));
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["minterp", "in.mp4"]).unwrap();
        let config = build_pipeline_config(&cli);
        assert_eq!(config.segment_count, 5);
        assert_eq!(config.target_fps, 60);
        assert_eq!(config.threads_per_job, 2);
        assert_eq!(config.job_timeout, None);
        assert!(!config.keep_temp);
    }

    #[test]
    fn test_flags_are_applied() {
        let cli = Cli::try_parse_from([
            "minterp", "-s", "8", "--fps", "120", "-o", "/scratch", "--threads", "4",
            "--timeout", "600", "--keep-temp", "in.mp4",
        ])
        .unwrap();
        let config = build_pipeline_config(&cli);
        assert_eq!(config.segment_count, 8);
        assert_eq!(config.target_fps, 120);
        assert_eq!(config.threads_per_job, 4);
        assert_eq!(config.work_dir, Some(PathBuf::from("/scratch")));
        assert_eq!(config.output_dir, Some(PathBuf::from("/scratch")));
        assert_eq!(config.job_timeout, Some(Duration::from_secs(600)));
        assert!(config.keep_temp);
    }

    #[test]
    fn test_zero_segments_rejected() {
        assert!(Cli::try_parse_from(["minterp", "--segments", "0", "in.mp4"]).is_err());
        assert!(Cli::try_parse_from(["minterp", "--fps", "0", "in.mp4"]).is_err());
    }
}
