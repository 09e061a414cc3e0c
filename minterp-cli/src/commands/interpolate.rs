// minterp-cli/src/commands/interpolate.rs
//
// Runs the interpolation pipeline for the file named on the command line.

use crate::cli::Cli;
use crate::config::build_pipeline_config;
use crate::error::{CliResult, ensure_input_file};
use crate::progress::SegmentProgressDisplay;
use indicatif::MultiProgress;
use minterp_core::{PipelineOutput, check_media_tools, progress_channel, run_pipeline};

/// Validates the input, checks for ffmpeg/ffprobe and runs the pipeline
/// while rendering progress on `multi`.
pub fn run_interpolate(args: &Cli, multi: &MultiProgress) -> CliResult<PipelineOutput> {
    ensure_input_file(&args.input)?;
    check_media_tools()?;

    let config = build_pipeline_config(args);
    log::debug!("Pipeline configuration: {:?}", config);

    let (sender, receiver) = progress_channel();
    let display = SegmentProgressDisplay::spawn(multi.clone(), config.segment_count, receiver);
    let result = run_pipeline(&args.input, &config, sender);
    display.finish();
    result
}
