use anyhow::{Result, Context};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::time::Instant;
use indicatif::{ProgressBar, ProgressStyle};
use crate::app_config::Config;
use crate::file_utils::{FileManager, FileType};
use crate::subtitle_converter::SubtitleConverter;
use crate::video_encoder::{EncodeJob, Toolchain};
use crate::errors::EncoderError;

// @module: Application controller for subtitle burning and conversion

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        self.config.validate().is_ok()
    }

    /// Derive the burned-output path for a video file
    pub fn burn_output_path<P: AsRef<Path>>(&self, video: P) -> PathBuf {
        FileManager::output_sibling(video, &self.config.output.video_suffix, &self.config.output.container)
    }

    /// Derive the converted-ASS path for a subtitle file
    pub fn converted_subtitle_path<P: AsRef<Path>>(&self, subtitle: P) -> PathBuf {
        FileManager::output_sibling(subtitle, &self.config.output.subtitle_suffix, "ass")
    }

    /// Burn a subtitle file into a video file.
    ///
    /// SRT subtitles are converted to ASS next to the source first; ASS
    /// subtitles are used as-is. The output lands next to the video with the
    /// configured suffix and container.
    pub async fn run_burn(&self, video: PathBuf, subtitle: PathBuf, force_overwrite: bool) -> Result<()> {
        let start_time = Instant::now();

        if !FileManager::file_exists(&video) {
            return Err(anyhow::anyhow!("Video file does not exist: {:?}", video));
        }
        if !FileManager::file_exists(&subtitle) {
            return Err(anyhow::anyhow!("Subtitle file does not exist: {:?}", subtitle));
        }

        let output = self.burn_output_path(&video);
        if output.exists() && !force_overwrite {
            warn!("Skipping file, output already exists (use -f to force overwrite)");
            return Ok(());
        }

        // SRT input gets converted next to the original before encoding
        let subtitle_to_use = match FileManager::detect_file_type(&subtitle)? {
            FileType::SubtitleSrt => {
                info!("Converting subtitle to ASS");
                let converted = self.converted_subtitle_path(&subtitle);
                SubtitleConverter::convert_file(&subtitle, &converted)
                    .context("Failed to convert subtitle to ASS")?;
                converted
            },
            FileType::SubtitleAss => subtitle.clone(),
            other => {
                return Err(anyhow::anyhow!("Unsupported subtitle file {:?} ({:?})", subtitle, other));
            }
        };

        let toolchain = Toolchain::locate(&self.config.encoder);
        debug!("Using encoder: {:?}", toolchain.ffmpeg);

        // An unknown duration only degrades the progress display
        let total_duration = match toolchain.probe_duration_secs(&video, self.config.encoder.probe_timeout_secs).await {
            Ok(secs) => Some(secs),
            Err(e) => {
                warn!("Could not determine video duration: {}", e);
                None
            }
        };

        if let Some(secs) = total_duration {
            info!("Video duration: {}", Self::format_clock(secs));
        }

        info!("Burning subtitles into: {:?}", video);

        let progress_bar = Self::encode_progress_bar(total_duration);
        let mut last_logged_secs = 0.0_f64;

        let job = EncodeJob {
            video: video.clone(),
            subtitle: subtitle_to_use,
            output: output.clone(),
            copy_audio: self.config.encoder.copy_audio,
        };

        let result = toolchain.burn(&job, |progress| {
            progress_bar.set_position(progress.seconds_done as u64);

            let speed = progress.speed.map(|s| format!(" @ {}x", s)).unwrap_or_default();
            let fps = progress.fps.map(|f| format!(" ({} fps)", f)).unwrap_or_default();
            progress_bar.set_message(format!("{}{}", speed.trim_start(), fps));

            if progress.seconds_done - last_logged_secs >= 5.0 {
                debug!("Progress: {}{}", Self::format_clock(progress.seconds_done), speed);
                last_logged_secs = progress.seconds_done;
            }
        }).await;

        match result {
            Ok(()) => {
                progress_bar.finish_and_clear();
                info!("Success: {:?}", output);
                info!("Encoding completed in {}.", Self::format_duration(start_time.elapsed()));
                Ok(())
            },
            Err(EncoderError::Cancelled) => {
                progress_bar.abandon();
                warn!("Stopped by user");
                Ok(())
            },
            Err(e) => {
                progress_bar.abandon();
                error!("Encoding failed: {}", e);
                Err(e).context(format!("Failed to burn subtitles into {:?}", video))
            }
        }
    }

    /// Convert an SRT file, or every SRT file under a directory, to ASS.
    pub async fn run_convert(&self, input: PathBuf, output: Option<PathBuf>, force_overwrite: bool) -> Result<()> {
        if FileManager::dir_exists(&input) {
            let converted = self.convert_directory(&input, force_overwrite)?;
            info!("Finished converting {} files", converted);
            return Ok(());
        }

        if !FileManager::file_exists(&input) {
            return Err(anyhow::anyhow!("Input path does not exist: {:?}", input));
        }

        if FileManager::detect_file_type(&input)? != FileType::SubtitleSrt {
            return Err(anyhow::anyhow!("Input is not an SRT subtitle: {:?}", input));
        }

        let output = output.unwrap_or_else(|| self.converted_subtitle_path(&input));
        if output.exists() && !force_overwrite {
            warn!("Skipping file, output already exists (use -f to force overwrite)");
            return Ok(());
        }

        SubtitleConverter::convert_file(&input, &output)?;
        info!("Success: {:?}", output);

        Ok(())
    }

    /// Convert all SRT files found under a directory, returning the count
    fn convert_directory(&self, dir: &Path, force_overwrite: bool) -> Result<usize> {
        info!("Starting subtitle conversion for directory: {:?}", dir);

        let subtitle_files = FileManager::find_files(dir, "srt")?;
        if subtitle_files.is_empty() {
            warn!("No SRT files found in directory: {:?}", dir);
            return Ok(0);
        }

        let mut converted_count = 0;

        for subtitle in subtitle_files {
            let output = self.converted_subtitle_path(&subtitle);
            if output.exists() && !force_overwrite {
                warn!("Skipping {:?}, output already exists (use -f to force overwrite)", subtitle);
                continue;
            }

            info!("Converting: {:?}", subtitle);
            if let Err(e) = SubtitleConverter::convert_file(&subtitle, &output) {
                error!("Error converting file: {}", e);
            } else {
                converted_count += 1;
            }
        }

        Ok(converted_count)
    }

    // @creates: Progress bar sized to the video duration when known
    fn encode_progress_bar(total_duration: Option<f64>) -> ProgressBar {
        match total_duration {
            Some(secs) if secs > 0.0 => {
                let progress_bar = ProgressBar::new(secs.ceil() as u64);
                let template_result = ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% {msg} {eta}")
                    .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {percent}% {msg}"))
                    .unwrap_or_else(|_| ProgressStyle::default_bar());
                progress_bar.set_style(template_result.progress_chars("█▓▒░"));
                progress_bar
            },
            _ => ProgressBar::new_spinner(),
        }
    }

    /// Format seconds as a wall-clock style HH:MM:SS string
    fn format_clock(total_seconds: f64) -> String {
        let total = total_seconds as u64;
        format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
    }

    /// Format a duration for human display
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
