// ============================================================================
// minterp-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error types for the minterp pipeline
//
// Every pipeline stage reports failures through `CoreError`. The stage
// variants (Probe, Plan, Transcode, Concat) carry enough context for the CLI
// to tell the user which stage and which segment failed.

use std::process::ExitStatus;
use thiserror::Error;

/// Errors produced by the minterp pipeline.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Source metadata could not be read (missing file, unreadable, unparsable).
    #[error("Probe failed: {0}")]
    Probe(String),

    /// Invalid duration or segment count handed to the planner.
    #[error("Segment planning failed: {0}")]
    Plan(String),

    /// One segment's ffmpeg job failed.
    #[error("Transcoding segment {segment_index} failed: {cause}")]
    Transcode { segment_index: usize, cause: String },

    /// A segment job was stopped because a sibling job failed first.
    #[error("Transcoding segment {segment_index} was cancelled")]
    Cancelled { segment_index: usize },

    /// Joining the processed segments failed.
    #[error("Concatenation failed: {0}")]
    Concat(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Required dependency not found: {0}")]
    DependencyNotFound(String),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for minterp operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Index of the segment this error belongs to, if any.
    pub fn segment_index(&self) -> Option<usize> {
        match self {
            CoreError::Transcode { segment_index, .. } | CoreError::Cancelled { segment_index } => {
                Some(*segment_index)
            }
            _ => None,
        }
    }

    /// True for the error a job reports after being told to stop.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, CoreError::Cancelled { .. })
    }
}

/// Formats the message for an external command that could not be started.
pub fn command_start_message(cmd_name: impl AsRef<str>, err: std::io::Error) -> String {
    format!("failed to start {}: {}", cmd_name.as_ref(), err)
}

/// Formats the message for an external command whose wait failed.
pub fn command_wait_message(cmd_name: impl AsRef<str>, err: std::io::Error) -> String {
    format!("failed waiting for {}: {}", cmd_name.as_ref(), err)
}

/// Formats the message for an external command that exited unsuccessfully.
pub fn command_failed_message(
    cmd_name: impl AsRef<str>,
    status: ExitStatus,
    stderr: impl AsRef<str>,
) -> String {
    let stderr = stderr.as_ref().trim();
    if stderr.is_empty() {
        format!("{} exited with {}", cmd_name.as_ref(), status)
    } else {
        format!("{} exited with {}: {}", cmd_name.as_ref(), status, stderr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcode_error_carries_segment() {
        let err = CoreError::Transcode {
            segment_index: 3,
            cause: "boom".to_string(),
        };
        assert_eq!(err.segment_index(), Some(3));
        assert!(!err.is_cancellation());
        assert_eq!(err.to_string(), "Transcoding segment 3 failed: boom");
    }

    #[test]
    fn test_cancelled_is_cancellation() {
        let err = CoreError::Cancelled { segment_index: 1 };
        assert!(err.is_cancellation());
        assert_eq!(err.segment_index(), Some(1));
        assert_eq!(CoreError::Concat("x".into()).segment_index(), None);
    }
}
