// ============================================================================
// minterp-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg and ffprobe
//
// This module encapsulates every interaction with the external media engine.
// Traits (FfmpegSpawner, FfprobeExecutor) let the pipeline run against mock
// implementations in tests; the default implementations use the
// ffmpeg-sidecar and ffprobe crates.

use crate::error::{CoreError, CoreResult};

use std::io;
use std::process::{Command, Stdio};

/// ffmpeg argument builders for segment encodes and concatenation
pub mod ffmpeg_builder;

/// Traits and implementations for executing ffmpeg commands
pub mod ffmpeg_executor;

/// Traits and implementations for executing ffprobe commands
pub mod ffprobe_executor;

pub use ffmpeg_builder::{
    InterpolateParams, build_concat_command, build_interpolate_command, format_concat_manifest,
};
pub use ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner};
pub use ffprobe_executor::{CrateFfprobeExecutor, FfprobeExecutor};

/// Checks that an external command exists and can be started.
///
/// Runs `<cmd_name> -version` with output discarded.
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{}': {}", cmd_name, e);
            Err(CoreError::DependencyNotFound(format!("{cmd_name} ({e})")))
        }
    }
}

/// Checks for both ffmpeg and ffprobe.
pub fn check_media_tools() -> CoreResult<()> {
    check_dependency("ffmpeg")?;
    check_dependency("ffprobe")
}
