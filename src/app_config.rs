use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Encoder toolchain settings
    #[serde(default)]
    pub encoder: EncoderConfig,

    /// Output naming settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for the external ffmpeg/ffprobe toolchain
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EncoderConfig {
    // @field: Explicit ffmpeg binary path, overrides discovery
    #[serde(default)]
    pub ffmpeg_path: Option<String>,

    // @field: Explicit ffprobe binary path, overrides discovery
    #[serde(default)]
    pub ffprobe_path: Option<String>,

    // @field: Duration probe timeout in seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    // @field: Copy the audio stream instead of re-encoding it
    #[serde(default = "default_true")]
    pub copy_audio: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: None,
            ffprobe_path: None,
            probe_timeout_secs: default_probe_timeout_secs(),
            copy_audio: true,
        }
    }
}

/// Settings for derived output file names
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    // @field: Suffix appended to the video stem for the burned output
    #[serde(default = "default_video_suffix")]
    pub video_suffix: String,

    // @field: Container extension for the burned output
    #[serde(default = "default_container")]
    pub container: String,

    // @field: Suffix appended to the subtitle stem for the converted ASS file
    #[serde(default = "default_subtitle_suffix")]
    pub subtitle_suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            video_suffix: default_video_suffix(),
            container: default_container(),
            subtitle_suffix: default_subtitle_suffix(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_probe_timeout_secs() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_video_suffix() -> String {
    "_subtitled".to_string()
}

fn default_container() -> String {
    "mp4".to_string()
}

fn default_subtitle_suffix() -> String {
    "_converted".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.output.video_suffix.is_empty() {
            return Err(anyhow!("Output video suffix must not be empty"));
        }

        if self.output.container.is_empty() {
            return Err(anyhow!("Output container must not be empty"));
        }

        if self.output.subtitle_suffix.is_empty() {
            return Err(anyhow!("Converted subtitle suffix must not be empty"));
        }

        if self.encoder.probe_timeout_secs == 0 {
            return Err(anyhow!("Probe timeout must be greater than zero"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            encoder: EncoderConfig::default(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
