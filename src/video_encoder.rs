use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use regex::Regex;
use once_cell::sync::Lazy;
use log::{debug, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use crate::app_config::EncoderConfig;
use crate::errors::EncoderError;

// @module: External encoder process orchestration

// @const: Encode position in the encoder's stats line
static TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"time=(\d+):(\d+):(\d+\.\d+)").unwrap()
});

// @const: Encode speed multiplier
static SPEED_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"speed=\s*([\d.]+)x").unwrap()
});

// @const: Frames per second
static FPS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"fps=\s*([\d.]+)").unwrap()
});

// Install locations probed before falling back to a PATH lookup
const COMMON_INSTALL_DIRS: [&str; 4] = [
    "/opt/homebrew/bin",
    "/usr/local/bin",
    "/opt/local/bin",
    "/usr/bin",
];

// Stats lines arrive twice a second; a bounded window is enough for error reporting
const STDERR_WINDOW: usize = 256;

/// One parsed snapshot of encoder progress.
///
/// Built best-effort from a single stats line; `speed` and `fps` are absent
/// when the line does not carry them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodeProgress {
    /// Seconds of output already encoded
    pub seconds_done: f64,

    /// Encode speed relative to realtime (e.g. 1.48)
    pub speed: Option<f64>,

    /// Encoder frames per second
    pub fps: Option<f64>,
}

/// A single burn request handed to the encoder.
#[derive(Debug, Clone)]
pub struct EncodeJob {
    /// Source video file
    pub video: PathBuf,

    /// ASS subtitle file to render into the picture
    pub subtitle: PathBuf,

    /// Destination file
    pub output: PathBuf,

    /// Copy the audio stream instead of re-encoding it
    pub copy_audio: bool,
}

/// Resolved paths to the ffmpeg and ffprobe binaries.
#[derive(Debug, Clone)]
pub struct Toolchain {
    /// Path or bare command name for ffmpeg
    pub ffmpeg: PathBuf,

    /// Path or bare command name for ffprobe
    pub ffprobe: PathBuf,
}

impl Toolchain {
    /// Resolve the toolchain from configuration.
    ///
    /// Explicit configured paths win; otherwise the well-known install
    /// directories are probed, and as a last resort the bare command name is
    /// kept so the OS resolves it on PATH at spawn time.
    pub fn locate(config: &EncoderConfig) -> Self {
        Toolchain {
            ffmpeg: Self::resolve_binary("ffmpeg", config.ffmpeg_path.as_deref()),
            ffprobe: Self::resolve_binary("ffprobe", config.ffprobe_path.as_deref()),
        }
    }

    // @resolves: One binary name to a concrete path where possible
    fn resolve_binary(name: &str, explicit: Option<&str>) -> PathBuf {
        if let Some(path) = explicit {
            return PathBuf::from(path);
        }

        for dir in COMMON_INSTALL_DIRS {
            let candidate = Path::new(dir).join(name);
            if candidate.is_file() {
                return candidate;
            }
        }

        PathBuf::from(name)
    }

    /// Probe the duration of a video file in seconds.
    pub async fn probe_duration_secs<P: AsRef<Path>>(&self, video: P, timeout_secs: u64) -> Result<f64, EncoderError> {
        let video = video.as_ref();

        let probe_future = Command::new(&self.ffprobe)
            .args([
                "-v", "error",
                "-show_entries", "format=duration",
                "-of", "default=noprint_wrappers=1:nokey=1",
                video.to_str().unwrap_or_default(),
            ])
            .output();

        let output = tokio::select! {
            result = probe_future => {
                result.map_err(|e| self.spawn_error(&self.ffprobe, e))?
            },
            _ = tokio::time::sleep(Duration::from_secs(timeout_secs)) => {
                return Err(EncoderError::Timeout(timeout_secs));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EncoderError::Probe(filter_encoder_stderr(&stderr)));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout.trim().parse::<f64>()
            .map_err(|_| EncoderError::Probe(format!("unexpected duration output: {}", stdout.trim())))
    }

    /// Burn the subtitle into the video, reporting progress through the callback.
    ///
    /// The encoder renders the subtitle with its `ass` filter, using the
    /// subtitle's directory as the font search path. Progress is scraped from
    /// the stats lines the encoder writes to stderr. Ctrl-C kills the child
    /// and surfaces as `EncoderError::Cancelled`.
    pub async fn burn<F>(&self, job: &EncodeJob, mut on_progress: F) -> Result<(), EncoderError>
    where
        F: FnMut(&EncodeProgress),
    {
        let fonts_dir = job.subtitle.parent().unwrap_or(Path::new("."));
        let filter = format!("ass={}:fontsdir={}", job.subtitle.display(), fonts_dir.display());

        let mut command = Command::new(&self.ffmpeg);
        command
            .arg("-y")
            .arg("-i").arg(&job.video)
            .arg("-vf").arg(&filter);
        if job.copy_audio {
            command.args(["-c:a", "copy"]);
        }
        command
            .arg(&job.output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!("Encoder command: {:?}", command);

        let mut child = command.spawn()
            .map_err(|e| self.spawn_error(&self.ffmpeg, e))?;

        let stderr = child.stderr.take()
            .ok_or_else(|| EncoderError::SpawnFailed("encoder stderr was not captured".to_string()))?;
        let mut reader = BufReader::new(stderr);
        let mut buf: Vec<u8> = Vec::new();
        let mut recent_lines: VecDeque<String> = VecDeque::new();

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            buf.clear();
            tokio::select! {
                read = reader.read_until(b'\r', &mut buf) => {
                    if read? == 0 {
                        break;
                    }

                    // Stats lines end in a bare carriage return; everything
                    // else uses ordinary newlines
                    let chunk = String::from_utf8_lossy(&buf);
                    for line in chunk.split(&['\r', '\n'][..]) {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }

                        if let Some(progress) = parse_progress_line(line) {
                            on_progress(&progress);
                        } else {
                            let lower = line.to_lowercase();
                            if lower.contains("error") || lower.contains("warning") {
                                warn!("{}", line);
                            }
                        }

                        if recent_lines.len() >= STDERR_WINDOW {
                            recent_lines.pop_front();
                        }
                        recent_lines.push_back(line.to_string());
                    }
                },
                _ = &mut ctrl_c => {
                    warn!("Stop requested, terminating encoder");
                    let _ = child.start_kill();
                    let _ = child.wait().await;
                    return Err(EncoderError::Cancelled);
                }
            }
        }

        let status = child.wait().await?;
        if status.success() {
            Ok(())
        } else {
            let collected: Vec<String> = recent_lines.into_iter().collect();
            Err(EncoderError::ExitStatus {
                code: status.code().unwrap_or(-1),
                detail: filter_encoder_stderr(&collected.join("\n")),
            })
        }
    }

    fn spawn_error(&self, binary: &Path, error: std::io::Error) -> EncoderError {
        if error.kind() == std::io::ErrorKind::NotFound {
            EncoderError::MissingBinary(binary.display().to_string())
        } else {
            EncoderError::SpawnFailed(error.to_string())
        }
    }
}

/// Parse one encoder stats line into a progress snapshot.
///
/// Returns `None` for lines without a `time=` position; `speed=` and `fps=`
/// are captured when present.
pub fn parse_progress_line(line: &str) -> Option<EncodeProgress> {
    let caps = TIME_PATTERN.captures(line)?;

    let hours: f64 = caps[1].parse().ok()?;
    let minutes: f64 = caps[2].parse().ok()?;
    let seconds: f64 = caps[3].parse().ok()?;

    let speed = SPEED_PATTERN.captures(line).and_then(|c| c[1].parse().ok());
    let fps = FPS_PATTERN.captures(line).and_then(|c| c[1].parse().ok());

    Some(EncodeProgress {
        seconds_done: hours * 3600.0 + minutes * 60.0 + seconds,
        speed,
        fps,
    })
}

/// Filter encoder stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, stats and stream metadata noise.
pub fn filter_encoder_stderr(stderr: &str) -> String {
    let dominated_prefixes = [
        "ffmpeg version",
        "  built with",
        "  configuration:",
        "  lib",
        "Input #",
        "  Metadata:",
        "  Duration:",
        "  Chapter",
        "    Chapter",
        "  Stream #",
        "      Metadata:",
        "        title",
        "        BPS",
        "        DURATION",
        "        NUMBER_OF",
        "        _STATISTICS",
        "Output #",
        "Stream mapping:",
        "Press [q]",
        "frame=",
        "size=",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            !dominated_prefixes.iter().any(|p| line.starts_with(p) || trimmed.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown encoder error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
