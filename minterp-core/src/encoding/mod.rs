//! Segment planning, parallel interpolation and concatenation.
//!
//! The stages are independent so each can be exercised on its own with mock
//! ffmpeg implementations; `pipeline` wires them together.

pub mod merger;
pub mod parallel;
pub mod pipeline;
pub mod segmentation;
pub mod transcode;

pub use merger::SegmentMerger;
pub use parallel::ParallelDispatcher;
pub use pipeline::{Pipeline, PipelineOutput, PipelineStage, run_pipeline};
pub use segmentation::{Segment, plan_segments};
pub use transcode::{JobContext, SegmentResult, SegmentTranscoder};
