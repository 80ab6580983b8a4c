/*!
 * Tests for the application controller
 */

use std::path::PathBuf;
use anyhow::Result;
use hardsubber::app_config::Config;
use hardsubber::app_controller::Controller;

#[test]
fn test_controller_creation_withDefaultConfig_shouldInitialize() -> Result<()> {
    let controller = Controller::new_for_test()?;
    assert!(controller.is_initialized());
    Ok(())
}

#[test]
fn test_controller_withInvalidConfig_shouldReportUninitialized() -> Result<()> {
    let mut config = Config::default();
    config.output.container = String::new();

    let controller = Controller::with_config(config)?;
    assert!(!controller.is_initialized());
    Ok(())
}

#[test]
fn test_burn_output_path_withDefaults_shouldAppendSuffixAndContainer() -> Result<()> {
    let controller = Controller::new_for_test()?;

    let output = controller.burn_output_path("/videos/movie.mkv");
    assert_eq!(output, PathBuf::from("/videos/movie_subtitled.mp4"));
    Ok(())
}

#[test]
fn test_burn_output_path_withCustomNaming_shouldHonorConfig() -> Result<()> {
    let mut config = Config::default();
    config.output.video_suffix = "_hardsub".to_string();
    config.output.container = "mkv".to_string();

    let controller = Controller::with_config(config)?;
    let output = controller.burn_output_path("/videos/movie.mp4");
    assert_eq!(output, PathBuf::from("/videos/movie_hardsub.mkv"));
    Ok(())
}

#[test]
fn test_converted_subtitle_path_withDefaults_shouldAppendSuffix() -> Result<()> {
    let controller = Controller::new_for_test()?;

    let output = controller.converted_subtitle_path("/subs/movie.srt");
    assert_eq!(output, PathBuf::from("/subs/movie_converted.ass"));
    Ok(())
}

#[tokio::test]
async fn test_run_burn_withMissingVideo_shouldError() -> Result<()> {
    let controller = Controller::new_for_test()?;

    let result = controller.run_burn(
        PathBuf::from("/nonexistent/video.mkv"),
        PathBuf::from("/nonexistent/subs.srt"),
        false,
    ).await;
    assert!(result.is_err());
    Ok(())
}

#[tokio::test]
async fn test_run_convert_withMissingInput_shouldError() -> Result<()> {
    let controller = Controller::new_for_test()?;

    let result = controller.run_convert(PathBuf::from("/nonexistent/subs.srt"), None, false).await;
    assert!(result.is_err());
    Ok(())
}
