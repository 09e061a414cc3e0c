// minterp-cli/src/cli.rs
//
// Defines the command-line argument structure using clap.

use clap::Parser;
use minterp_core::config::{DEFAULT_SEGMENT_COUNT, DEFAULT_TARGET_FPS, DEFAULT_THREADS_PER_JOB};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "minterp: parallel motion interpolation",
    long_about = "Splits a video into segments, runs ffmpeg's minterpolate filter on every \
                  segment at the same time and joins the results without re-encoding."
)]
pub struct Cli {
    /// Source video file
    #[arg(required = true, value_name = "INPUT")]
    pub input: PathBuf,

    /// Number of equal-length segments processed in parallel
    #[arg(
        short = 's',
        long = "segments",
        value_name = "N",
        default_value_t = DEFAULT_SEGMENT_COUNT as u32,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub segments: u32,

    /// Target frame rate for motion interpolation
    #[arg(
        long,
        value_name = "FPS",
        default_value_t = DEFAULT_TARGET_FPS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub fps: u32,

    /// Directory for scratch and output files (defaults to the system temp dir)
    /// Can also be set via the MINTERP_OUTDIR environment variable.
    #[arg(short = 'o', long = "outdir", value_name = "DIR", env = "MINTERP_OUTDIR")]
    pub outdir: Option<PathBuf>,

    /// ffmpeg thread hint for each segment job
    #[arg(
        long,
        value_name = "N",
        default_value_t = DEFAULT_THREADS_PER_JOB,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub threads: u32,

    /// Optional: abort a segment job after this many seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Keep segment files when transcoding fails
    #[arg(long, default_value_t = false)]
    pub keep_temp: bool,

    /// Print the run summary as JSON instead of the output path
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
