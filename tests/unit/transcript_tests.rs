/*!
 * Tests for recognizer transcript parsing
 */

use srtscribe::transcript::{parse_segments_json, SegmentTiming, Transcription};
use crate::common;

#[test]
fn test_parseSegmentsJson_withBareArray_shouldParseSegments() {
    let json = r#"[
        {"start": 0.0, "end": 1.0, "text": " Hi there", "words": [
            {"word": " Hi", "start": 0.0, "end": 0.4},
            {"word": " there", "start": 0.4, "end": 1.0}
        ]},
        {"start": 1.5, "end": 2.0, "text": " Bye"}
    ]"#;

    let segments = parse_segments_json(json).unwrap();

    assert_eq!(segments.len(), 2);
    match segments[0].timing() {
        SegmentTiming::Words(words) => {
            assert_eq!(words.len(), 2);
            assert_eq!(words[1].text, " there");
        }
        SegmentTiming::Plain => panic!("expected word timing"),
    }
    assert_eq!(segments[1].timing(), SegmentTiming::Plain);
}

#[test]
fn test_parseSegmentsJson_withWrappedObject_shouldParseSegments() {
    let json = r#"{"language": "en", "segments": [{"start": 0.0, "end": 2.5, "text": " hello world "}]}"#;

    let segments = parse_segments_json(json).unwrap();

    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].text, " hello world ");
}

#[test]
fn test_parseSegmentsJson_withSerializedTranscription_shouldRoundTrip() {
    let transcription = common::sample_transcription();
    let json = serde_json::to_string(&transcription).unwrap();

    let segments = parse_segments_json(&json).unwrap();
    let decoded: Transcription = serde_json::from_str(&json).unwrap();

    assert_eq!(segments, transcription.segments);
    assert_eq!(decoded, transcription);
}

#[test]
fn test_parseSegmentsJson_withGarbage_shouldFail() {
    assert!(parse_segments_json("not json").is_err());
    assert!(parse_segments_json(r#"{"text": "no segments"}"#).is_err());
}
