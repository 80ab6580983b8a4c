use std::path::Path;
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::Result;
use log::debug;
use crate::file_utils::FileManager;

// @module: SRT to ASS subtitle conversion

// @const: Block separator (runs of blank lines)
static BLOCK_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\n+").unwrap()
});

// @const: Inline markup tag pattern
static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]+>").unwrap()
});

// @const: SRT timestamp, anchored at the start only
static SRT_TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d+):(\d+),(\d+)").unwrap()
});

/// Fixed ASS style header prepended to every conversion result.
/// Players match on these exact field values, so the header is reproduced
/// byte for byte, including the trailing newline.
pub const ASS_STYLE_HEADER: &str = r"[Script Info]
Title: Subtitles
ScriptType: v4.00+
Collisions: Normal
PlayResX: 1920
PlayResY: 800

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Default,SF Arabic MPV,56,&H00FFFFFF,&H000000FF,&H00000000,&H64000000,-1,0,0,0,100,100,0,0,1,2,1,2,10,10,120,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
";

// @struct: Stateless SRT to ASS converter
pub struct SubtitleConverter;

impl SubtitleConverter {
    /// Convert SRT subtitle text to ASS subtitle text.
    ///
    /// The conversion is best-effort and never fails: blocks with fewer than
    /// three lines or without a single ` --> ` timing separator are dropped
    /// without notice, and timestamps that do not match the SRT shape are
    /// carried over unchanged. Event order follows block order in the input.
    pub fn convert(input: &str) -> String {
        let mut events: Vec<String> = Vec::new();

        for block in BLOCK_SEPARATOR.split(input.trim()) {
            let lines: Vec<&str> = block.trim().split('\n').collect();
            if lines.len() < 3 {
                // Index and timing alone make no renderable event
                continue;
            }

            let timing = lines[1];
            let times: Vec<&str> = timing.split(" --> ").collect();
            if times.len() != 2 {
                continue;
            }

            let text = lines[2..].join("\n");
            let text = TAG_PATTERN.replace_all(&text, "");
            // ASS uses a literal backslash-N as its forced line break
            let text = text.replace('\n', "\\N");

            let start = Self::convert_timestamp(times[0].trim());
            let end = Self::convert_timestamp(times[1].trim());
            events.push(format!("Dialogue: 0,{},{},Default,,0,0,0,,{}", start, end, text));
        }

        format!("{}{}", ASS_STYLE_HEADER, events.join("\n"))
    }

    /// Convert one SRT timestamp (`H:MM:SS,mmm`) to ASS form (`H:MM:SS.cc`).
    ///
    /// Hour, minute and second fields pass through exactly as matched, and
    /// only the millisecond field is reduced to centiseconds. A string that
    /// does not start with the SRT shape is returned unchanged; trailing
    /// characters after a match are ignored.
    pub fn convert_timestamp(timestamp: &str) -> String {
        if let Some(caps) = SRT_TIMESTAMP.captures(timestamp) {
            if let Ok(millis) = caps[4].parse::<u64>() {
                return format!("{}:{}:{}.{:02}", &caps[1], &caps[2], &caps[3], millis / 10);
            }
        }
        timestamp.to_string()
    }

    /// Convert an SRT file on disk and write the ASS result to `output`.
    pub fn convert_file<P1: AsRef<Path>, P2: AsRef<Path>>(input: P1, output: P2) -> Result<()> {
        let input = input.as_ref();
        let output = output.as_ref();

        let content = FileManager::read_to_string(input)?;

        let ass = Self::convert(&content);
        debug!("Converted {} to {} ASS bytes", input.display(), ass.len());

        FileManager::write_to_file(output, &ass)
    }
}
