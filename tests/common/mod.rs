/*!
 * Common test utilities for the srtscribe test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Result;
use tempfile::TempDir;
use srtscribe::transcript::{Segment, Transcription, Word};

/// Route library logs to the test harness; safe to call from every test
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// `count` consecutive words of `step` seconds starting at `start`,
/// with recognizer-style leading spaces
pub fn timed_words(count: usize, start: f64, step: f64) -> Vec<Word> {
    (0..count)
        .map(|i| {
            let word_start = start + i as f64 * step;
            Word::new(format!(" w{}", i), word_start, word_start + step)
        })
        .collect()
}

/// Seven 0.5 s words from t=0
pub fn seven_word_segment() -> Segment {
    Segment::from_words(timed_words(7, 0.0, 0.5))
}

/// A segment with word timing followed by a timing-less one
pub fn sample_segments() -> Vec<Segment> {
    vec![
        Segment::from_words(vec![
            Word::new(" The", 0.0, 0.32),
            Word::new(" quick", 0.32, 0.61),
            Word::new(" brown", 0.61, 0.9),
            Word::new(" fox", 0.9, 1.2),
            Word::new(" jumps", 1.2, 1.55),
            Word::new(" over", 1.55, 1.8),
            Word::new(" the", 1.8, 1.95),
            Word::new(" lazy", 1.95, 2.3),
            Word::new(" dog.", 2.3, 2.75),
        ]),
        Segment::plain(3.0, 5.5, " And that was all. "),
    ]
}

/// A finished transcription over `sample_segments`
pub fn sample_transcription() -> Transcription {
    Transcription {
        segments: sample_segments(),
        language: "en".to_string(),
        language_probability: 0.98,
        duration: Some(5.5),
    }
}

/// A handcrafted multipart body carrying one field
pub fn multipart_body(boundary: &str, field: &str, file_name: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: audio/wav\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}
