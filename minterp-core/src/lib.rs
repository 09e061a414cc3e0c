//! Core library for parallel motion interpolation of video files.
//!
//! A source is probed with ffprobe, split into equal-length segments, each
//! segment is re-encoded through ffmpeg's `minterpolate` filter on its own
//! thread, and the results are joined with the concat demuxer using stream
//! copy.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use minterp_core::config::PipelineConfigBuilder;
//! use minterp_core::{progress_channel, run_pipeline};
//! use std::path::Path;
//!
//! let config = PipelineConfigBuilder::new()
//!     .segment_count(5)
//!     .target_fps(60)
//!     .build();
//! let (progress, _events) = progress_channel();
//!
//! let output = run_pipeline(Path::new("/videos/clip.mp4"), &config, progress).unwrap();
//! println!("{}", output.output_path.display());
//! ```

pub mod config;
pub mod encoding;
pub mod error;
pub mod external;
pub mod media;
pub mod progress_reporting;
pub mod temp_files;
pub mod utils;

// Re-exports for public API
pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use encoding::{
    ParallelDispatcher, Pipeline, PipelineOutput, PipelineStage, Segment, SegmentMerger,
    SegmentResult, SegmentTranscoder, plan_segments, run_pipeline,
};
pub use error::{CoreError, CoreResult};
pub use external::{check_media_tools, CrateFfprobeExecutor, FfprobeExecutor, SidecarSpawner};
pub use media::SourceMedia;
pub use progress_reporting::{ProgressEvent, ProgressSender, progress_channel};
pub use utils::{format_duration, parse_ffmpeg_time};
