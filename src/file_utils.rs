use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use once_cell::sync::Lazy;
use regex::Regex;

// @module: File and directory utilities

// @const: SRT body shape used for content sniffing
static SRT_BODY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+\s*\r?\n\d{1,2}:\d{2}:\d{2},\d{3}\s+-->\s+\d{1,2}:\d{2}:\d{2},\d{3}").unwrap()
});

// Common video container extensions handled by ffmpeg
const VIDEO_EXTENSIONS: [&str; 14] = [
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v",
    "mpg", "mpeg", "ogv", "ts", "mts", "m2ts",
];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Sibling output path from an input file
    // @params: input_file, suffix, extension
    pub fn output_sibling<P: AsRef<Path>>(input_file: P, suffix: &str, extension: &str) -> PathBuf {
        let input_file = input_file.as_ref();

        // Build "<stem><suffix>.<extension>" next to the input
        let stem = input_file.file_stem().unwrap_or_default();
        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push_str(suffix);
        output_filename.push('.');
        output_filename.push_str(extension);

        match input_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(output_filename),
            _ => PathBuf::from(output_filename),
        }
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(normalized_ext) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Classify a file as video, SRT subtitle, ASS subtitle or unknown.
    ///
    /// Extension wins when present; an SRT content sniff covers files that
    /// carry no useful extension.
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        if let Some(ext) = path.extension() {
            let ext_str = ext.to_string_lossy().to_lowercase();

            if ext_str == "srt" {
                return Ok(FileType::SubtitleSrt);
            }
            if ext_str == "ass" {
                return Ok(FileType::SubtitleAss);
            }
            if VIDEO_EXTENSIONS.contains(&ext_str.as_str()) {
                return Ok(FileType::Video);
            }
        }

        // Fall back to examining file contents
        if let Ok(content) = fs::read_to_string(path) {
            if content.contains("-->") && SRT_BODY_PATTERN.is_match(&content) {
                return Ok(FileType::SubtitleSrt);
            }
        }

        Ok(FileType::Unknown)
    }
}

/// Enum representing different file types
#[derive(Debug, PartialEq, Eq)]
pub enum FileType {
    /// SRT subtitle file
    SubtitleSrt,
    /// ASS subtitle file
    SubtitleAss,
    /// Video file supported by ffmpeg
    Video,
    /// Unknown file type
    Unknown,
}
