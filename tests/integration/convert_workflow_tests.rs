/*!
 * End-to-end tests for the subtitle conversion workflow
 */

use anyhow::Result;
use hardsubber::app_config::Config;
use hardsubber::app_controller::Controller;
use hardsubber::file_utils::FileManager;
use hardsubber::subtitle_converter::{SubtitleConverter, ASS_STYLE_HEADER};
use crate::common;

#[test]
fn test_convert_file_withSampleSubtitle_shouldWriteAssOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    let srt = common::create_test_subtitle(&dir, "movie.srt")?;
    let output = dir.join("movie_converted.ass");

    SubtitleConverter::convert_file(&srt, &output)?;

    let ass = FileManager::read_to_string(&output)?;
    assert!(ass.starts_with(ASS_STYLE_HEADER));
    assert_eq!(ass.lines().filter(|l| l.starts_with("Dialogue:")).count(), 3);
    assert!(ass.contains("Dialogue: 0,00:00:01.00,00:00:04.00,Default,,0,0,0,,This is a test subtitle."));

    Ok(())
}

#[tokio::test]
async fn test_run_convert_withSingleFile_shouldDeriveOutputName() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    let srt = common::create_test_subtitle(&dir, "movie.srt")?;

    let controller = Controller::with_config(Config::default())?;
    controller.run_convert(srt, None, false).await?;

    let output = dir.join("movie_converted.ass");
    assert!(FileManager::file_exists(&output));

    Ok(())
}

#[tokio::test]
async fn test_run_convert_withExplicitOutput_shouldUseIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    let srt = common::create_test_subtitle(&dir, "movie.srt")?;
    let explicit = dir.join("chosen.ass");

    let controller = Controller::with_config(Config::default())?;
    controller.run_convert(srt, Some(explicit.clone()), false).await?;

    assert!(FileManager::file_exists(&explicit));

    Ok(())
}

#[tokio::test]
async fn test_run_convert_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    let srt = common::create_test_subtitle(&dir, "movie.srt")?;
    let output = dir.join("movie_converted.ass");
    common::create_test_file(&dir, "movie_converted.ass", "sentinel")?;

    let controller = Controller::with_config(Config::default())?;

    // Without force the existing file is left alone
    controller.run_convert(srt.clone(), None, false).await?;
    assert_eq!(FileManager::read_to_string(&output)?, "sentinel");

    // With force it is overwritten with a real conversion
    controller.run_convert(srt, None, true).await?;
    assert!(FileManager::read_to_string(&output)?.starts_with(ASS_STYLE_HEADER));

    Ok(())
}

#[tokio::test]
async fn test_run_convert_withDirectory_shouldConvertAllSrtFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    common::create_test_subtitle(&dir, "one.srt")?;
    let nested = dir.join("season2");
    FileManager::ensure_dir(&nested)?;
    common::create_test_subtitle(&nested, "two.srt")?;
    common::create_test_file(&dir, "notes.txt", "not a subtitle")?;

    let controller = Controller::with_config(Config::default())?;
    controller.run_convert(dir.clone(), None, false).await?;

    assert!(FileManager::file_exists(dir.join("one_converted.ass")));
    assert!(FileManager::file_exists(nested.join("two_converted.ass")));
    assert!(!FileManager::file_exists(dir.join("notes_converted.ass")));

    Ok(())
}

#[tokio::test]
async fn test_run_convert_withNonSrtFile_shouldError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    let ass = common::create_test_file(&dir, "already.ass", "[Script Info]")?;

    let controller = Controller::with_config(Config::default())?;
    let result = controller.run_convert(ass, None, false).await;
    assert!(result.is_err());

    Ok(())
}
