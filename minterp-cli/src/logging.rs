// minterp-cli/src/logging.rs
//
// The CLI logs through the `log` facade with `env_logger` as the backend.
// RUST_LOG overrides the default filter:
// - RUST_LOG=info (default): stage transitions and per-segment progress
// - RUST_LOG=debug (or --verbose): ffmpeg commands, paths and cleanup
//
// Records are written while the segment progress bars are suspended, so log
// lines land above the bars instead of tearing through them.

use env_logger::{Env, Target};
use indicatif::MultiProgress;
use std::io::{self, Write};

/// Writes to stderr with the bars of `progress` cleared for the duration of
/// each write.
pub struct ProgressAwareWriter {
    progress: MultiProgress,
}

impl ProgressAwareWriter {
    pub fn new(progress: MultiProgress) -> Self {
        Self { progress }
    }
}

impl Write for ProgressAwareWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.progress.suspend(|| io::stderr().write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// Installs the global logger. `verbose` raises the default filter to debug.
/// Log output is coordinated with the bars drawn on `progress`.
pub fn init_logging(verbose: bool, progress: MultiProgress) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_secs()
        .target(Target::Pipe(Box::new(ProgressAwareWriter::new(progress))))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicatif::{ProgressBar, ProgressDrawTarget};

    #[test]
    fn test_writer_passes_through_while_bars_are_active() {
        let progress = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        let bar = progress.add(ProgressBar::new(100));
        bar.set_position(40);

        let mut writer = ProgressAwareWriter::new(progress);
        let line = b"[INFO] Segment 1 finished\n";
        assert_eq!(writer.write(line).unwrap(), line.len());
        writer.flush().unwrap();
        // Bars keep their state across a suspended write.
        assert_eq!(bar.position(), 40);
    }
}
