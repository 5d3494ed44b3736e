use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context, anyhow};
use log::{warn, debug};

use crate::grouping::GroupingConfig;
use crate::transcript::{Segment, SegmentTiming, Word};

// @module: Cue building and SubRip serialization

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2,}):(\d{2}):(\d{2}),(\d{3}) --> (\d{2,}):(\d{2}):(\d{2}),(\d{3})$").unwrap()
});

// @const: Slack absorbed when converting seconds to whole milliseconds, in ms.
// Keeps exact millisecond inputs such as 1.234 from landing on 1233 because of
// binary float representation, while still truncating real sub-ms fractions.
const MS_EPSILON: f64 = 1e-6;

// @struct: Single subtitle cue
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEntry {
    // @field: Sequence number, 1-based
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    /// Creates an entry from times in seconds, truncating to whole milliseconds
    pub fn from_seconds(seq_num: usize, start: f64, end: f64, text: String) -> Self {
        Self::new(seq_num, seconds_to_ms(start), seconds_to_ms(end), text)
    }

    // @creates: Validated subtitle entry
    // @validates: Time range and non-empty text
    pub fn new_validated(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Result<Self> {
        // Zero-length cues are legal: a recognizer may report a word with start == end
        if end_time_ms < start_time_ms {
            return Err(anyhow!(
                "Invalid time range: end time {} < start time {}",
                end_time_ms, start_time_ms
            ));
        }

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(anyhow!("Empty subtitle text for entry {}", seq_num));
        }

        Ok(SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text: trimmed_text.to_string(),
        })
    }

    /// Parse an SRT timestamp to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        // Parse HH:MM:SS,mmm format
        let parts: Vec<&str> = timestamp.split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }

    /// Format a time in seconds to SRT format, truncating sub-millisecond precision
    pub fn format_seconds(seconds: f64) -> String {
        Self::format_timestamp(seconds_to_ms(seconds))
    }
}

/// Convert seconds to whole milliseconds, truncating toward zero.
///
/// Negative and NaN inputs map to zero; the recognizer contract only produces
/// non-negative times.
pub fn seconds_to_ms(seconds: f64) -> u64 {
    if seconds.is_nan() || seconds <= 0.0 {
        return 0;
    }
    // `as` saturates for values beyond u64::MAX
    (seconds * 1000.0 + MS_EPSILON).floor() as u64
}

// One cue block: index, timing line, text. No trailing blank line; blocks are
// separated when the document is assembled.
impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)
    }
}

/// Ordered collection of subtitle cues
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubtitleCollection {
    /// List of subtitle entries
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Create an empty subtitle collection
    pub fn new() -> Self {
        SubtitleCollection {
            entries: Vec::new(),
        }
    }

    /// Build cues from recognizer segments.
    ///
    /// A segment without word timing becomes exactly one cue spanning the
    /// segment. Otherwise its words are partitioned with `grouping` and each
    /// group becomes one cue. Numbering runs across all segments from 1.
    pub fn from_segments(segments: &[Segment], grouping: &GroupingConfig) -> Self {
        let mut entries = Vec::new();

        for segment in segments {
            match segment.timing() {
                SegmentTiming::Plain => {
                    entries.push(SubtitleEntry::from_seconds(
                        entries.len() + 1,
                        segment.start,
                        segment.end,
                        segment.text.trim().to_string(),
                    ));
                }
                SegmentTiming::Words(words) => {
                    for group in grouping.partition(words) {
                        entries.push(Self::entry_for_group(entries.len() + 1, group));
                    }
                }
            }
        }

        debug!("Built {} cues from {} segments", entries.len(), segments.len());

        SubtitleCollection { entries }
    }

    // Group is never empty: partition only yields non-empty slices
    fn entry_for_group(seq_num: usize, group: &[Word]) -> SubtitleEntry {
        let start = group.first().map_or(0.0, |w| w.start);
        let end = group.last().map_or(0.0, |w| w.end);
        let text: String = group.iter().map(|w| w.text.as_str()).collect();

        SubtitleEntry::from_seconds(seq_num, start, end, text.trim().to_string())
    }

    /// Render the collection as a SubRip document
    pub fn to_srt_string(&self) -> String {
        self.entries
            .iter()
            .map(|entry| entry.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Write subtitles to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;

        file.write_all(self.to_srt_string().as_bytes())
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))?;

        Ok(())
    }

    /// Parse SRT format string into subtitle entries.
    ///
    /// Entries keep the sequence numbers found in the document so callers can
    /// check numbering; unreadable blocks are skipped with a warning.
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>> {
        let mut entries = Vec::new();

        // State variables for parsing
        let mut current_seq_num: Option<usize> = None;
        let mut current_times: Option<(u64, u64)> = None;
        let mut current_text = String::new();

        let mut add_current_entry = |seq_num: usize, start_ms: u64, end_ms: u64, text: &str| {
            match SubtitleEntry::new_validated(seq_num, start_ms, end_ms, text.to_string()) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping invalid subtitle entry {}: {}", seq_num, e),
            }
        };

        for (line_index, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            // A blank line closes the current entry
            if trimmed.is_empty() {
                if let (Some(seq_num), Some((start_ms, end_ms))) = (current_seq_num, current_times) {
                    if !current_text.is_empty() {
                        add_current_entry(seq_num, start_ms, end_ms, &current_text);
                        current_seq_num = None;
                        current_times = None;
                        current_text.clear();
                    }
                }
                continue;
            }

            if current_seq_num.is_none() {
                match trimmed.parse::<usize>() {
                    Ok(num) => current_seq_num = Some(num),
                    Err(_) => warn!("Unexpected text at line {} before sequence number: {}", line_index + 1, trimmed),
                }
                continue;
            }

            if current_times.is_none() {
                match Self::parse_timing_line(trimmed) {
                    Some(times) => current_times = Some(times),
                    None => {
                        warn!("Invalid timestamp line at line {}: {}", line_index + 1, trimmed);
                        current_seq_num = None;
                    }
                }
                continue;
            }

            if !current_text.is_empty() {
                current_text.push('\n');
            }
            current_text.push_str(trimmed);
        }

        // Add the last entry if there is one
        if let (Some(seq_num), Some((start_ms, end_ms))) = (current_seq_num, current_times) {
            if !current_text.is_empty() {
                add_current_entry(seq_num, start_ms, end_ms, &current_text);
            }
        }

        let overlap_count = entries
            .windows(2)
            .filter(|pair| pair[0].end_time_ms > pair[1].start_time_ms)
            .count();
        if overlap_count > 0 {
            warn!("Found {} overlapping subtitle entries", overlap_count);
        }

        Ok(entries)
    }

    fn parse_timing_line(line: &str) -> Option<(u64, u64)> {
        let caps = TIMESTAMP_REGEX.captures(line)?;
        let field = |idx: usize| caps.get(idx).and_then(|m| m.as_str().parse::<u64>().ok());

        let start = field(1)? * 3_600_000 + field(2)? * 60_000 + field(3)? * 1_000 + field(4)?;
        let end = field(5)? * 3_600_000 + field(6)? * 60_000 + field(7)? * 1_000 + field(8)?;
        Some((start, end))
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_srt_string())
    }
}

/// Render recognizer segments straight to a SubRip document
pub fn generate_srt(segments: &[Segment], grouping: &GroupingConfig) -> String {
    SubtitleCollection::from_segments(segments, grouping).to_srt_string()
}
