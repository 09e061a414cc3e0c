//! Segment merger for minterp
//!
//! Joins the interpolated segments with ffmpeg's concat demuxer using stream
//! copy, so the segments are never re-encoded. The concat manifest lives in
//! the run directory next to the segments it lists.

use std::path::{Path, PathBuf};

use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use log::{debug, error, info, warn};

use crate::encoding::transcode::SegmentResult;
use crate::error::{CoreError, CoreResult, command_failed_message};
use crate::external::ffmpeg_builder::{build_concat_command, format_concat_manifest};
use crate::external::ffmpeg_executor::{FfmpegProcess, FfmpegSpawner};
use crate::media::SourceMedia;
use crate::temp_files::{RunDirectory, processed_output_path};

/// Number of ffmpeg error lines kept for a failed concat.
const MAX_STDERR_LINES: usize = 20;

/// Concatenates processed segments into the final output file.
pub struct SegmentMerger<S: FfmpegSpawner> {
    spawner: S,
}

impl<S: FfmpegSpawner> SegmentMerger<S> {
    pub fn new(spawner: S) -> Self {
        Self { spawner }
    }

    /// Merge `results`, in the order given, into `<output_dir>/processed-<basename>`.
    ///
    /// On success the segment files and the manifest are deleted. When ffmpeg
    /// fails they are left in place and any partial output is removed.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Concat` if there is nothing to merge, a segment
    /// file is missing, the output directory or manifest cannot be written,
    /// or ffmpeg fails.
    pub fn concat(
        &self,
        source: &SourceMedia,
        results: &[SegmentResult],
        run_dir: &RunDirectory,
        output_dir: &Path,
    ) -> CoreResult<PathBuf> {
        if results.is_empty() {
            return Err(CoreError::Concat("no segments to merge".to_string()));
        }
        if let Some(missing) = results.iter().find(|r| !r.path.is_file()) {
            return Err(CoreError::Concat(format!(
                "segment {} file does not exist: {}",
                missing.index,
                missing.path.display()
            )));
        }

        let basename = source.basename()?;
        std::fs::create_dir_all(output_dir).map_err(|e| {
            CoreError::Concat(format!(
                "cannot create output directory {}: {}",
                output_dir.display(),
                e
            ))
        })?;
        let output_path = processed_output_path(output_dir, &basename);
        let manifest_path = run_dir.manifest_path(&basename);

        let segment_paths: Vec<&Path> = results.iter().map(|r| r.path.as_path()).collect();
        std::fs::write(&manifest_path, format_concat_manifest(&segment_paths)).map_err(|e| {
            CoreError::Concat(format!(
                "cannot write concat manifest {}: {}",
                manifest_path.display(),
                e
            ))
        })?;
        debug!("Wrote concat manifest {}", manifest_path.display());

        info!(
            "Merging {} segments into {}",
            results.len(),
            output_path.display()
        );
        self.run_concat(&manifest_path, &output_path).inspect_err(|e| {
            error!(
                "{}; keeping segments and manifest in {}",
                e,
                run_dir.path().display()
            );
            remove_partial_output(&output_path);
        })?;

        if !output_path.exists() {
            return Err(CoreError::Concat(format!(
                "ffmpeg reported success but {} is missing",
                output_path.display()
            )));
        }

        for path in segment_paths
            .iter()
            .copied()
            .chain(std::iter::once(manifest_path.as_path()))
        {
            if let Err(e) = std::fs::remove_file(path) {
                warn!("Failed to remove temporary file {}: {}", path.display(), e);
            }
        }

        info!("Merged output written to {}", output_path.display());
        Ok(output_path)
    }

    fn run_concat(&self, manifest_path: &Path, output_path: &Path) -> CoreResult<()> {
        let mut process = self
            .spawner
            .spawn(build_concat_command(manifest_path, output_path))
            .map_err(CoreError::Concat)?;

        let mut stderr_lines: Vec<String> = Vec::new();
        let streamed = process.handle_events(|event| -> Result<(), String> {
            match event {
                FfmpegEvent::Error(line)
                | FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line) => {
                    if stderr_lines.len() == MAX_STDERR_LINES {
                        stderr_lines.remove(0);
                    }
                    stderr_lines.push(line);
                }
                _ => {}
            }
            Ok(())
        });

        let status = process.wait().map_err(CoreError::Concat)?;
        streamed.map_err(CoreError::Concat)?;

        if status.success() {
            Ok(())
        } else {
            Err(CoreError::Concat(command_failed_message(
                "ffmpeg concat",
                status,
                stderr_lines.join("\n"),
            )))
        }
    }
}

/// Deletes whatever a failed concat left at `output_path`.
fn remove_partial_output(output_path: &Path) {
    match std::fs::remove_file(output_path) {
        Ok(()) => debug!("Removed partial output {}", output_path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(
            "Failed to remove partial output {}: {}",
            output_path.display(),
            e
        ),
    }
}
