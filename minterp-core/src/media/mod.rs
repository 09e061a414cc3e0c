//! Source media description produced by the prober.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::utils::get_filename_safe;

/// A probed source file. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceMedia {
    /// Absolute path of the source
    pub path: PathBuf,
    /// Total duration in seconds
    pub duration_secs: f64,
    pub format_name: Option<String>,
    pub video_codec: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    /// Average frame rate of the video stream
    pub frame_rate: Option<f64>,
}

impl SourceMedia {
    /// Creates a source description, rejecting unusable durations.
    pub fn new(path: PathBuf, duration_secs: f64) -> CoreResult<Self> {
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(CoreError::Probe(format!(
                "invalid duration {duration_secs} reported for {}",
                path.display()
            )));
        }
        Ok(Self {
            path,
            duration_secs,
            format_name: None,
            video_codec: None,
            width: None,
            height: None,
            frame_rate: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name of the source, used to name scratch and output files.
    pub fn basename(&self) -> CoreResult<String> {
        get_filename_safe(&self.path)
    }
}
