// minterp-core/tests/common/mod.rs
//
// Mock ffmpeg/ffprobe implementations shared by the integration tests.
// Segment jobs run on several threads, so all shared state sits behind
// Arc<Mutex<..>> or atomics.

#![allow(dead_code)]

use minterp_core::error::{CoreError, CoreResult};
use minterp_core::external::ffmpeg_executor::{
    FfmpegProcess, FfmpegSpawner, ProcessResult, command_args,
};
use minterp_core::external::ffprobe_executor::FfprobeExecutor;
use minterp_core::media::SourceMedia;

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, FfmpegProgress};
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A progress event as ffmpeg-sidecar reports it.
pub fn progress_at(time: &str) -> FfmpegEvent {
    FfmpegEvent::Progress(FfmpegProgress {
        frame: 1,
        fps: 30.0,
        q: 0.0,
        size_kb: 1,
        time: time.to_string(),
        bitrate_kbps: 100.0,
        speed: 1.0,
        raw_log_message: String::new(),
    })
}

/// `count` progress events, each one second later than the previous.
pub fn progress_events(count: usize) -> Vec<FfmpegEvent> {
    (1..=count)
        .map(|s| progress_at(&format!("00:00:{:02}.00", s % 60)))
        .collect()
}

/// How a mocked process behaves once spawned.
#[derive(Clone)]
pub struct MockBehavior {
    pub events: Vec<FfmpegEvent>,
    /// Sleep before each event is delivered
    pub event_delay: Duration,
    pub exit_code: i32,
    /// Write a dummy file at the last command argument on spawn
    pub create_dummy_output: bool,
}

impl MockBehavior {
    pub fn success() -> Self {
        Self {
            events: progress_events(2),
            event_delay: Duration::ZERO,
            exit_code: 0,
            create_dummy_output: true,
        }
    }

    /// Succeeds after roughly `events * delay`.
    pub fn slow(events: usize, delay: Duration) -> Self {
        Self {
            events: progress_events(events),
            event_delay: delay,
            ..Self::success()
        }
    }

    /// Exits with `exit_code` after printing `message`.
    pub fn failure(exit_code: i32, message: &str) -> Self {
        Self {
            events: vec![FfmpegEvent::Error(message.to_string())],
            event_delay: Duration::ZERO,
            exit_code,
            create_dummy_output: true,
        }
    }
}

/// Counters shared between a spawner and the processes it created.
#[derive(Default)]
pub struct MockStats {
    pub active: AtomicUsize,
    pub max_active: AtomicUsize,
    pub kills: AtomicUsize,
    pub waits: AtomicUsize,
}

pub struct MockFfmpegProcess {
    behavior: MockBehavior,
    killed: bool,
    waited: bool,
    stats: Arc<MockStats>,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F, E>(&mut self, mut handler: F) -> Result<(), E>
    where
        F: FnMut(FfmpegEvent) -> Result<(), E>,
        E: From<String>,
    {
        for event in std::mem::take(&mut self.behavior.events) {
            if !self.behavior.event_delay.is_zero() {
                std::thread::sleep(self.behavior.event_delay);
            }
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> ProcessResult<ExitStatus> {
        if !self.waited {
            self.waited = true;
            self.stats.waits.fetch_add(1, Ordering::SeqCst);
            self.stats.active.fetch_sub(1, Ordering::SeqCst);
        }
        if self.killed {
            // SIGKILL
            Ok(ExitStatus::from_raw(9))
        } else {
            Ok(ExitStatus::from_raw(self.behavior.exit_code << 8))
        }
    }

    fn kill(&mut self) -> ProcessResult<()> {
        self.killed = true;
        self.stats.kills.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct MockExpectation {
    arg_pattern: String,
    result: Result<MockBehavior, String>,
}

/// Mock spawner. Expectations are matched against any argument containing
/// their pattern and consumed; unmatched commands use the fallback behavior
/// or panic when there is none.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    expectations: Arc<Mutex<Vec<MockExpectation>>>,
    fallback: Arc<Mutex<Option<MockBehavior>>>,
    received_calls: Arc<Mutex<Vec<Vec<String>>>>,
    manifests: Arc<Mutex<Vec<String>>>,
    pub stats: Arc<MockStats>,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Default::default()
    }

    /// Spawner where every command succeeds immediately.
    pub fn succeeding() -> Self {
        Self::new().with_fallback(MockBehavior::success())
    }

    pub fn with_fallback(self, behavior: MockBehavior) -> Self {
        *self.fallback.lock().unwrap() = Some(behavior);
        self
    }

    pub fn expect(&self, arg_pattern: &str, behavior: MockBehavior) {
        self.expectations.lock().unwrap().push(MockExpectation {
            arg_pattern: arg_pattern.to_string(),
            result: Ok(behavior),
        });
    }

    pub fn expect_spawn_error(&self, arg_pattern: &str, message: &str) {
        self.expectations.lock().unwrap().push(MockExpectation {
            arg_pattern: arg_pattern.to_string(),
            result: Err(message.to_string()),
        });
    }

    pub fn received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.lock().unwrap().clone()
    }

    /// Calls whose arguments mention the concat demuxer.
    pub fn concat_calls(&self) -> Vec<Vec<String>> {
        self.received_calls()
            .into_iter()
            .filter(|args| args.iter().any(|a| a == "concat"))
            .collect()
    }

    /// Contents of every concat manifest, read when its command was spawned.
    pub fn manifests(&self) -> Vec<String> {
        self.manifests.lock().unwrap().clone()
    }

    pub fn kills(&self) -> usize {
        self.stats.kills.load(Ordering::SeqCst)
    }

    pub fn max_active(&self) -> usize {
        self.stats.max_active.load(Ordering::SeqCst)
    }

    fn snapshot_manifest(&self, args: &[String]) {
        if !args.iter().any(|a| a == "concat") {
            return;
        }
        if let Some(pos) = args.iter().position(|a| a == "-i") {
            if let Ok(content) = std::fs::read_to_string(&args[pos + 1]) {
                self.manifests.lock().unwrap().push(content);
            }
        }
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> ProcessResult<Self::Process> {
        let args = command_args(&cmd);
        self.received_calls.lock().unwrap().push(args.clone());
        self.snapshot_manifest(&args);

        let matched = {
            let mut expectations = self.expectations.lock().unwrap();
            expectations
                .iter()
                .position(|exp| args.iter().any(|arg| arg.contains(&exp.arg_pattern)))
                .map(|index| expectations.remove(index).result)
        };
        let behavior = match matched {
            Some(result) => result?,
            None => self
                .fallback
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| panic!("MockFfmpegSpawner: no expectation for {args:?}")),
        };

        if behavior.create_dummy_output {
            let output = PathBuf::from(args.last().expect("command has an output argument"));
            std::fs::write(&output, b"mock media").expect("write dummy output");
        }

        let active = self.stats.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.max_active.fetch_max(active, Ordering::SeqCst);

        Ok(MockFfmpegProcess {
            behavior,
            killed: false,
            waited: false,
            stats: Arc::clone(&self.stats),
        })
    }
}

/// Mock prober returning a fixed duration for any path.
#[derive(Clone)]
pub struct MockFfprobeExecutor {
    duration: Result<f64, String>,
    calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockFfprobeExecutor {
    pub fn with_duration(duration: f64) -> Self {
        Self {
            duration: Ok(duration),
            calls: Arc::default(),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            duration: Err(message.to_string()),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl FfprobeExecutor for MockFfprobeExecutor {
    fn probe(&self, input_path: &Path) -> CoreResult<SourceMedia> {
        self.calls.lock().unwrap().push(input_path.to_path_buf());
        match &self.duration {
            Ok(duration) => SourceMedia::new(input_path.to_path_buf(), *duration),
            Err(message) => Err(CoreError::Probe(message.clone())),
        }
    }
}

/// Creates an (empty) source file named `name` inside `dir`.
pub fn source_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"source").expect("write source file");
    path
}

/// Run directories created under `work_dir`.
pub fn run_dirs(work_dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(work_dir)
        .expect("read work dir")
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_dir()
                && path
                    .file_name()
                    .is_some_and(|n| n.to_string_lossy().starts_with("minterp-"))
        })
        .collect()
}

/// Files inside `dir`, sorted by name.
pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read dir")
        .filter_map(|entry| entry.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
