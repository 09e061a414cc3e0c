// ============================================================================
// minterp-core/src/external/ffmpeg_builder.rs
// ============================================================================
//
// FFMPEG COMMAND BUILDERS: Argument assembly for the two ffmpeg invocations
//
// - the per-segment motion interpolation encode
// - the stream-copy concatenation of processed segments
//
// Both are plain functions over ffmpeg-sidecar's `FfmpegCommand` so the
// argument lists can be checked in tests without running ffmpeg.

use std::path::{Path, PathBuf};

use ffmpeg_sidecar::command::FfmpegCommand;

use crate::encoding::segmentation::Segment;

/// Parameters for one motion-interpolation segment encode.
#[derive(Debug, Clone)]
pub struct InterpolateParams {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub start_secs: f64,
    pub duration_secs: f64,
    pub target_fps: u32,
    pub threads: u32,
}

impl InterpolateParams {
    /// Parameters for encoding `segment` of `input_path` into `output_path`.
    pub fn for_segment(
        input_path: &Path,
        output_path: &Path,
        segment: &Segment,
        target_fps: u32,
        threads: u32,
    ) -> Self {
        Self {
            input_path: input_path.to_path_buf(),
            output_path: output_path.to_path_buf(),
            start_secs: segment.start,
            duration_secs: segment.duration(),
            target_fps,
            threads,
        }
    }
}

/// Filter expression for the `minterpolate` video filter.
pub fn minterpolate_filter(target_fps: u32) -> String {
    format!("minterpolate='fps={target_fps}'")
}

/// Builds the ffmpeg command that interpolates one segment.
///
/// `-threads` and `-ss` are input options so that ffmpeg seeks in the input
/// and limits decoder threads; `-t` bounds the output to the segment length.
pub fn build_interpolate_command(params: &InterpolateParams) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    cmd.args(["-threads", &params.threads.to_string()])
        .args(["-ss", &format_seconds(params.start_secs)])
        .input(params.input_path.to_string_lossy().as_ref())
        .args(["-t", &format_seconds(params.duration_secs)])
        .args(["-vf", &minterpolate_filter(params.target_fps)])
        .overwrite()
        .output(params.output_path.to_string_lossy().as_ref());
    cmd
}

/// Builds the ffmpeg command that joins the files listed in `manifest`
/// without re-encoding.
pub fn build_concat_command(manifest: &Path, output: &Path) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    cmd.args(["-f", "concat", "-safe", "0"])
        .input(manifest.to_string_lossy().as_ref())
        .args(["-c", "copy"])
        .overwrite()
        .output(output.to_string_lossy().as_ref());
    cmd
}

/// Renders a concat-demuxer manifest: one `file '<path>'` line per entry, in
/// the given order.
pub fn format_concat_manifest<P: AsRef<Path>>(paths: &[P]) -> String {
    let mut manifest = String::new();
    for path in paths {
        let escaped = path.as_ref().to_string_lossy().replace('\'', r"'\''");
        manifest.push_str(&format!("file '{escaped}'\n"));
    }
    manifest
}

fn format_seconds(seconds: f64) -> String {
    format!("{seconds:.6}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::ffmpeg_executor::command_args;

    fn position(args: &[String], value: &str) -> usize {
        args.iter()
            .position(|a| a == value)
            .unwrap_or_else(|| panic!("missing argument {value} in {args:?}"))
    }

    #[test]
    fn test_interpolate_command_arguments() {
        let segment = Segment { index: 2, start: 40.0, end: 60.0 };
        let params = InterpolateParams::for_segment(
            Path::new("/videos/in.mp4"),
            Path::new("/tmp/run/40.000-60.000-in.mp4"),
            &segment,
            60,
            2,
        );
        let args = command_args(&build_interpolate_command(&params));

        let input = position(&args, "/videos/in.mp4");
        assert_eq!(args[position(&args, "-threads") + 1], "2");
        assert_eq!(args[position(&args, "-ss") + 1], "40.000000");
        assert_eq!(args[position(&args, "-t") + 1], "20.000000");
        assert_eq!(args[position(&args, "-vf") + 1], "minterpolate='fps=60'");
        assert!(position(&args, "-ss") < input, "seek must be an input option");
        assert!(position(&args, "-threads") < input);
        assert!(position(&args, "-t") > input);
        assert_eq!(args.last().unwrap(), "/tmp/run/40.000-60.000-in.mp4");
        assert!(args.contains(&"-y".to_string()));
    }

    #[test]
    fn test_concat_command_uses_stream_copy() {
        let args = command_args(&build_concat_command(
            Path::new("/tmp/run/concat-in.mp4.txt"),
            Path::new("/tmp/processed-in.mp4"),
        ));
        for expected in ["-f", "concat", "-safe", "0", "-c", "copy", "-y"] {
            assert!(args.contains(&expected.to_string()), "missing {expected}");
        }
        assert_eq!(args[position(&args, "-i") + 1], "/tmp/run/concat-in.mp4.txt");
        assert_eq!(args.last().unwrap(), "/tmp/processed-in.mp4");
    }

    #[test]
    fn test_manifest_keeps_order_and_escapes_quotes() {
        let manifest = format_concat_manifest(&["/tmp/a.mp4", "/tmp/it's.mp4", "/tmp/c.mp4"]);
        assert_eq!(
            manifest,
            "file '/tmp/a.mp4'\nfile '/tmp/it'\\''s.mp4'\nfile '/tmp/c.mp4'\n"
        );
    }

    #[test]
    fn test_minterpolate_filter() {
        assert_eq!(minterpolate_filter(120), "minterpolate='fps=120'");
    }
}
