use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// @module: Recognizer output data model

/// A single recognized token with its timing, in seconds.
///
/// `text` is kept exactly as the recognizer produced it, including any leading
/// space used as a word delimiter. Callers guarantee `end >= start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    // @field: Raw token text
    #[serde(alias = "word")]
    pub text: String,

    // @field: Start time in seconds
    pub start: f64,

    // @field: End time in seconds
    pub end: f64,
}

impl Word {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Word {
            text: text.into(),
            start,
            end,
        }
    }
}

/// A contiguous span of recognized speech.
///
/// An empty `words` list means the recognizer did not provide word-level
/// timing for this span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(default)]
    pub words: Vec<Word>,
}

/// How a segment's cues get their timing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentTiming<'a> {
    /// Word-level timing is available
    Words(&'a [Word]),
    /// Only the segment's own start/end are known
    Plain,
}

impl Segment {
    /// Creates a segment without word-level timing
    pub fn plain(start: f64, end: f64, text: impl Into<String>) -> Self {
        Segment {
            start,
            end,
            text: text.into(),
            words: Vec::new(),
        }
    }

    /// Creates a segment from timed words; span and text are derived from them
    pub fn from_words(words: Vec<Word>) -> Self {
        let start = words.first().map_or(0.0, |w| w.start);
        let end = words.last().map_or(0.0, |w| w.end);
        let text = words.iter().map(|w| w.text.as_str()).collect();
        Segment {
            start,
            end,
            text,
            words,
        }
    }

    pub fn timing(&self) -> SegmentTiming<'_> {
        if self.words.is_empty() {
            SegmentTiming::Plain
        } else {
            SegmentTiming::Words(&self.words)
        }
    }
}

/// Result of transcribing one audio file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    /// Recognized segments in chronological order
    pub segments: Vec<Segment>,

    /// Detected (or forced) language code
    pub language: String,

    /// Confidence of the language detection, 0.0 to 1.0
    #[serde(default)]
    pub language_probability: f64,

    /// Audio duration in seconds, when the recognizer reports it
    #[serde(default)]
    pub duration: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TranscriptFile {
    Bare(Vec<Segment>),
    Wrapped { segments: Vec<Segment> },
}

/// Parse a transcript JSON document into segments.
///
/// Accepts either a bare array of segments or an object with a `segments` key
/// (which is what a serialized [`Transcription`] looks like).
pub fn parse_segments_json(content: &str) -> Result<Vec<Segment>> {
    let file: TranscriptFile =
        serde_json::from_str(content).context("Failed to parse transcript JSON")?;

    Ok(match file {
        TranscriptFile::Bare(segments) => segments,
        TranscriptFile::Wrapped { segments } => segments,
    })
}
