//! FFprobe integration for source media analysis
//!
//! The pipeline only needs the total duration of the source to plan segments;
//! the remaining container details are logged so a run's log shows what was
//! processed.
use crate::error::{CoreError, CoreResult};
use crate::media::SourceMedia;
use crate::utils::parse_frame_rate;
use ffprobe::{FfProbeError, ffprobe};
use std::path::Path;

/// Trait for probing a source file.
pub trait FfprobeExecutor: Send + Sync {
    /// Reads the duration and container metadata of `input_path`.
    fn probe(&self, input_path: &Path) -> CoreResult<SourceMedia>;
}

/// Concrete implementation of `FfprobeExecutor` using the `ffprobe` crate.
#[derive(Debug, Clone, Default)]
pub struct CrateFfprobeExecutor;

impl CrateFfprobeExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl FfprobeExecutor for CrateFfprobeExecutor {
    fn probe(&self, input_path: &Path) -> CoreResult<SourceMedia> {
        log::debug!(
            "Running ffprobe (via crate) for source info on: {}",
            input_path.display()
        );
        if !input_path.is_file() {
            return Err(CoreError::Probe(format!(
                "source file not found: {}",
                input_path.display()
            )));
        }

        let metadata = ffprobe(input_path).map_err(|err| {
            log::error!("ffprobe failed on {}: {:?}", input_path.display(), err);
            map_ffprobe_error(err, input_path)
        })?;

        let duration_secs = metadata
            .format
            .duration
            .as_deref()
            .and_then(|d| d.parse::<f64>().ok())
            .ok_or_else(|| {
                CoreError::Probe(format!(
                    "no duration reported for {}",
                    input_path.display()
                ))
            })?;

        let mut media = SourceMedia::new(input_path.to_path_buf(), duration_secs)?;
        media.format_name = Some(metadata.format.format_name.clone());

        if let Some(video_stream) = metadata
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
        {
            media.video_codec = video_stream.codec_name.clone();
            media.width = video_stream.width;
            media.height = video_stream.height;
            media.frame_rate = parse_frame_rate(&video_stream.avg_frame_rate)
                .or_else(|| parse_frame_rate(&video_stream.r_frame_rate));
        } else {
            log::warn!("No video stream reported for {}", input_path.display());
        }

        Ok(media)
    }
}

fn map_ffprobe_error(err: FfProbeError, input_path: &Path) -> CoreError {
    let path = input_path.display();
    match err {
        FfProbeError::Io(io_err) => {
            CoreError::Probe(format!("failed to start ffprobe for {path}: {io_err}"))
        }
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            CoreError::Probe(format!(
                "ffprobe exited with {} for {path}: {}",
                output.status,
                stderr.trim()
            ))
        }
        FfProbeError::Deserialize(err) => {
            CoreError::Probe(format!("could not parse ffprobe output for {path}: {err}"))
        }
        _ => CoreError::Probe(format!("unknown ffprobe error for {path}: {err:?}")),
    }
}
