// ============================================================================
// minterp-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management and Abstraction
//
// Defines the seam between the pipeline and running ffmpeg processes. A
// segment job spawns one process, drains its event stream, and waits for a
// single exit status. Jobs run on several threads at once, so spawners must
// be shareable across threads.
//
// KEY COMPONENTS:
// - FfmpegProcess: Trait representing an active FFmpeg process
// - FfmpegSpawner: Trait for creating new FFmpeg processes
// - SidecarSpawner: Concrete implementation using ffmpeg-sidecar

use crate::error::{command_start_message, command_wait_message};
use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::process::ExitStatus;

/// Error text from a process operation. Callers attach stage and segment
/// context when turning it into a `CoreError`.
pub type ProcessResult<T> = std::result::Result<T, String>;

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Feeds every event to `handler` until the stream ends or the handler
    /// returns an error, which stops iteration and is passed through.
    fn handle_events<F, E>(&mut self, handler: F) -> std::result::Result<(), E>
    where
        F: FnMut(FfmpegEvent) -> std::result::Result<(), E>,
        E: From<String>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> ProcessResult<ExitStatus>;

    /// Terminates the process. The caller still has to `wait` afterwards.
    fn kill(&mut self) -> ProcessResult<()>;
}

/// Trait representing something that can spawn an FfmpegProcess.
pub trait FfmpegSpawner: Send + Sync {
    type Process: FfmpegProcess;
    /// Spawns the ffmpeg command, consuming the command object.
    fn spawn(&self, cmd: FfmpegCommand) -> ProcessResult<Self::Process>;
}

// --- Concrete Implementation using ffmpeg-sidecar ---

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `FfmpegProcess`.
pub struct SidecarProcess(SidecarChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F, E>(&mut self, mut handler: F) -> std::result::Result<(), E>
    where
        F: FnMut(FfmpegEvent) -> std::result::Result<(), E>,
        E: From<String>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {}", e);
            E::from(format!("failed to read ffmpeg events: {e}"))
        })?;
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> ProcessResult<ExitStatus> {
        self.0
            .wait()
            .map_err(|e| command_wait_message("ffmpeg (sidecar)", e))
    }

    fn kill(&mut self) -> ProcessResult<()> {
        self.0
            .kill()
            .map_err(|e| format!("failed to kill ffmpeg (sidecar): {e}"))
    }
}

/// Concrete implementation of `FfmpegSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> ProcessResult<Self::Process> {
        log::debug!("Spawning ffmpeg: {:?}", cmd);
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_message("ffmpeg (sidecar)", e))
    }
}

/// Collects the arguments of a command as owned strings.
pub fn command_args(cmd: &FfmpegCommand) -> Vec<String> {
    cmd.get_args()
        .map(|s| s.to_string_lossy().into_owned())
        .collect()
}
