/*!
 * Tests for encoder progress parsing and stderr handling
 */

use hardsubber::app_config::EncoderConfig;
use hardsubber::video_encoder::{parse_progress_line, filter_encoder_stderr, Toolchain};

#[test]
fn test_parse_progress_line_withFullStatsLine_shouldExtractAllFields() {
    let line = "frame=  888 fps= 30 q=28.0 size=    4864KiB time=00:01:30.50 bitrate= 440.2kbits/s speed=1.48x";
    let progress = parse_progress_line(line).unwrap();

    assert!((progress.seconds_done - 90.5).abs() < 1e-9);
    assert_eq!(progress.speed, Some(1.48));
    assert_eq!(progress.fps, Some(30.0));
}

#[test]
fn test_parse_progress_line_withTimeOnly_shouldLeaveOptionalFieldsEmpty() {
    let progress = parse_progress_line("time=01:00:00.00").unwrap();

    assert!((progress.seconds_done - 3600.0).abs() < 1e-9);
    assert_eq!(progress.speed, None);
    assert_eq!(progress.fps, None);
}

#[test]
fn test_parse_progress_line_withoutTimeField_shouldReturnNone() {
    assert!(parse_progress_line("Press [q] to stop, [?] for help").is_none());
    assert!(parse_progress_line("speed=1.00x").is_none());
    assert!(parse_progress_line("").is_none());
}

#[test]
fn test_parse_progress_line_withIntegerSeconds_shouldReturnNone() {
    // The stats line always carries fractional seconds; a bare integer does not match
    assert!(parse_progress_line("time=00:01:30 speed=1.0x").is_none());
}

#[test]
fn test_filter_encoder_stderr_withBannerNoise_shouldKeepOnlyMeaningfulLines() {
    let stderr = "ffmpeg version 6.0 Copyright (c) 2000-2023\n  built with clang\n  configuration: --enable-gpl\nInput #0, matroska,webm, from 'movie.mkv':\n  Duration: 01:30:00.00\nError opening subtitle file\nPress [q] to stop";
    let filtered = filter_encoder_stderr(stderr);

    assert_eq!(filtered, "Error opening subtitle file");
}

#[test]
fn test_filter_encoder_stderr_withStatsLines_shouldDropThem() {
    let stderr = "frame=  888 fps= 30 time=00:01:30.50 speed=1.48x\nsize=    4864KiB\nConversion failed!";
    let filtered = filter_encoder_stderr(stderr);

    assert_eq!(filtered, "Conversion failed!");
}

#[test]
fn test_filter_encoder_stderr_withOnlyNoise_shouldFallBackToFixedMessage() {
    let stderr = "ffmpeg version 6.0\nStream mapping:\n";
    let filtered = filter_encoder_stderr(stderr);

    assert!(filtered.contains("unknown encoder error"));
}

#[test]
fn test_toolchain_locate_withExplicitPaths_shouldUseThemVerbatim() {
    let config = EncoderConfig {
        ffmpeg_path: Some("/custom/ffmpeg".to_string()),
        ffprobe_path: Some("/custom/ffprobe".to_string()),
        ..EncoderConfig::default()
    };

    let toolchain = Toolchain::locate(&config);
    assert_eq!(toolchain.ffmpeg.to_string_lossy(), "/custom/ffmpeg");
    assert_eq!(toolchain.ffprobe.to_string_lossy(), "/custom/ffprobe");
}

#[test]
fn test_toolchain_locate_withoutExplicitPaths_shouldAlwaysResolveSomething() {
    let toolchain = Toolchain::locate(&EncoderConfig::default());

    // Either a discovered absolute path or the bare name for PATH lookup
    assert!(toolchain.ffmpeg.to_string_lossy().contains("ffmpeg"));
    assert!(toolchain.ffprobe.to_string_lossy().contains("ffprobe"));
}

#[tokio::test]
async fn test_probe_duration_withMissingBinary_shouldReportMissingBinary() {
    let config = EncoderConfig {
        ffprobe_path: Some("/nonexistent/bin/ffprobe".to_string()),
        ..EncoderConfig::default()
    };
    let toolchain = Toolchain::locate(&config);

    let result = toolchain.probe_duration_secs("input.mkv", 5).await;
    let error = result.unwrap_err();
    assert!(format!("{}", error).contains("Encoder binary not found"));
}
