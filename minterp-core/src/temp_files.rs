//! Scratch file layout for a pipeline run.
//!
//! Every run gets its own scratch directory (`minterp-<random>`) under the
//! configured work directory, created with `tempfile` so concurrent runs on
//! the same source never share one. Inside it, segment outputs and the
//! concat manifest use deterministic names derived from the segment index,
//! its range and the source basename.
//!
//! The directory is removed when the `RunDirectory` is dropped. Call
//! [`RunDirectory::keep`] to leave it on disk for inspection.

use std::path::{Path, PathBuf};

use tempfile::{Builder as TempFileBuilder, TempDir};

use crate::encoding::segmentation::Segment;
use crate::error::CoreResult;
use crate::utils::format_timestamp;

/// Prefix of per-run scratch directories.
pub const RUN_DIR_PREFIX: &str = "minterp-";

/// A run-scoped scratch directory, deleted with everything in it on drop.
#[derive(Debug)]
pub struct RunDirectory {
    dir: TempDir,
}

impl RunDirectory {
    /// Creates a fresh `minterp-XXXXXX` directory under `work_dir`, creating
    /// `work_dir` first if needed.
    pub fn create(work_dir: &Path) -> CoreResult<Self> {
        std::fs::create_dir_all(work_dir)?;
        let dir = TempFileBuilder::new()
            .prefix(RUN_DIR_PREFIX)
            .tempdir_in(work_dir)?;
        log::debug!("Created run directory {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the processed file for `segment`:
    /// `<index>-<start>-<end>-<basename>`, index zero-padded to three digits.
    pub fn segment_output_path(&self, segment: &Segment, source_basename: &str) -> PathBuf {
        self.path().join(format!(
            "{:03}-{}-{}-{}",
            segment.index,
            format_timestamp(segment.start),
            format_timestamp(segment.end),
            source_basename
        ))
    }

    /// Path of the concat manifest: `concat-<basename>.txt`.
    pub fn manifest_path(&self, source_basename: &str) -> PathBuf {
        self.path().join(format!("concat-{source_basename}.txt"))
    }

    /// Disarms cleanup and returns the directory path.
    pub fn keep(self) -> PathBuf {
        self.dir.keep()
    }

    /// Removes the directory now, reporting failures instead of ignoring them.
    pub fn close(self) -> std::io::Result<()> {
        self.dir.close()
    }
}

/// Final output location: `<output_dir>/processed-<basename>`.
pub fn processed_output_path(output_dir: &Path, source_basename: &str) -> PathBuf {
    output_dir.join(format!("processed-{source_basename}"))
}
