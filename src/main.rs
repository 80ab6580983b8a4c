// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod subtitle_converter;
mod video_encoder;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Burn a subtitle file into a video file (default command)
    Burn(BurnArgs),

    /// Convert an SRT subtitle file (or a directory of them) to ASS
    Convert(ConvertArgs),

    /// Generate shell completions for hardsubber
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct BurnArgs {
    /// Input video file
    #[arg(value_name = "VIDEO")]
    video: PathBuf,

    /// Subtitle file (SRT or ASS)
    #[arg(value_name = "SUBTITLE")]
    subtitle: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// SRT file or directory to convert
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output file path (single-file mode only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// Hardsubber - burn subtitles into video files
///
/// Converts SRT subtitles to styled ASS and renders them into the video
/// stream with ffmpeg.
#[derive(Parser, Debug)]
#[command(name = "hardsubber")]
#[command(version = "0.1.0")]
#[command(about = "Subtitle burn-in tool")]
#[command(long_about = "Hardsubber burns subtitles into video files using ffmpeg.

EXAMPLES:
    hardsubber movie.mkv movie.srt              # Burn subtitles with default config
    hardsubber -f movie.mkv movie.srt           # Force overwrite existing output
    hardsubber convert movie.srt                # Convert SRT to ASS only
    hardsubber convert /subs/ -f                # Convert a whole directory
    hardsubber completions bash > hs.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input video file
    #[arg(value_name = "VIDEO")]
    video: Option<PathBuf>,

    /// Subtitle file (SRT or ASS)
    #[arg(value_name = "SUBTITLE")]
    subtitle: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                color, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "hardsubber", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Burn(args)) => run_burn(args).await,
        Some(Commands::Convert(args)) => run_convert(args).await,
        None => {
            // Default behavior - treat top-level args as a burn request
            let video = cli.video.ok_or_else(|| {
                anyhow!("VIDEO is required when no subcommand is specified")
            })?;
            let subtitle = cli.subtitle.ok_or_else(|| {
                anyhow!("SUBTITLE is required when no subcommand is specified")
            })?;

            run_burn(BurnArgs {
                video,
                subtitle,
                force_overwrite: cli.force_overwrite,
                config_path: cli.config_path,
                log_level: cli.log_level,
            }).await
        }
    }
}

async fn run_burn(options: BurnArgs) -> Result<()> {
    let config = load_config(&options.config_path, options.log_level.as_ref())?;

    let controller = Controller::with_config(config)?;
    controller.run_burn(options.video, options.subtitle, options.force_overwrite).await
}

async fn run_convert(options: ConvertArgs) -> Result<()> {
    let config = load_config(&options.config_path, options.log_level.as_ref())?;

    let controller = Controller::with_config(config)?;
    controller.run_convert(options.input_path, options.output, options.force_overwrite).await
}

/// Load the configuration file, creating a default one when missing,
/// and apply the command line log level on top.
fn load_config(config_path: &str, cmd_log_level: Option<&CliLogLevel>) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = cmd_log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(to_level_filter(&config_log_level));
    }

    let config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        // Update log level in config if specified via command line
        if let Some(log_level) = cmd_log_level {
            config.log_level = log_level.clone().into();
        }

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();

        if let Some(log_level) = cmd_log_level {
            config.log_level = log_level.clone().into();
        }

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if cmd_log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    Ok(config)
}
