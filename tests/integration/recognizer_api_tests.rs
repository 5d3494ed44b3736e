/*!
 * Integration tests for the Whisper API recognizer against a mock HTTP server
 */

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use srtscribe::errors::RecognizerError;
use srtscribe::recognizer::{AudioInput, Recognizer, WhisperApiRecognizer};
use srtscribe::transcript::SegmentTiming;

fn recognizer_for(server: &MockServer) -> WhisperApiRecognizer {
    WhisperApiRecognizer::new(format!("{}/v1/", server.uri()), "", "whisper-test", 10)
        .unwrap()
        .with_retries(2, 1)
}

fn audio() -> AudioInput {
    AudioInput::new("talk.wav", b"RIFF....WAVEfmt ".to_vec()).with_content_type("audio/wav")
}

#[tokio::test]
async fn test_transcribe_withVerboseJson_shouldMapSegmentsAndWords() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .and(body_string_contains("verbose_json"))
        .and(body_string_contains("whisper-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "language": "english",
            "duration": 3.5,
            "text": " one two three four five six seven",
            "segments": [
                {"id": 0, "start": 0.0, "end": 3.5, "text": " one two three four five six seven"}
            ],
            "words": [
                {"word": " one", "start": 0.0, "end": 0.5},
                {"word": " two", "start": 0.5, "end": 1.0},
                {"word": " three", "start": 1.0, "end": 1.5},
                {"word": " four", "start": 1.5, "end": 2.0},
                {"word": " five", "start": 2.0, "end": 2.5},
                {"word": " six", "start": 2.5, "end": 3.0},
                {"word": " seven", "start": 3.0, "end": 3.5}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let transcription = recognizer_for(&server).transcribe(audio()).await.unwrap();

    assert_eq!(transcription.language, "en");
    assert_eq!(transcription.language_probability, 0.0);
    assert_eq!(transcription.duration, Some(3.5));
    assert_eq!(transcription.segments.len(), 1);
    match transcription.segments[0].timing() {
        SegmentTiming::Words(words) => assert_eq!(words.len(), 7),
        SegmentTiming::Plain => panic!("expected word timing"),
    }
}

#[tokio::test]
async fn test_transcribe_withForcedLanguage_shouldSendItAndReportFullConfidence() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .and(body_string_contains("name=\"language\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "text": " bonjour",
            "segments": [{"start": 0.0, "end": 1.0, "text": " bonjour"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let recognizer = recognizer_for(&server).with_language("fr");
    let transcription = recognizer.transcribe(audio()).await.unwrap();

    assert_eq!(transcription.language, "fr");
    assert_eq!(transcription.language_probability, 1.0);
    assert_eq!(transcription.segments[0].timing(), SegmentTiming::Plain);
}

#[tokio::test]
async fn test_transcribe_withApiKey_shouldSendBearerToken() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .and(header("authorization", "Bearer secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "language": "en",
            "language_probability": 0.93,
            "text": "",
            "segments": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let recognizer = WhisperApiRecognizer::new(format!("{}/v1", server.uri()), "secret-key", "whisper-test", 10).unwrap();
    let transcription = recognizer.transcribe(audio()).await.unwrap();

    assert!(transcription.segments.is_empty());
    assert!((transcription.language_probability - 0.93).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_transcribe_withUnauthorized_shouldReturnAuthenticationError() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .expect(1)
        .mount(&server)
        .await;

    let result = recognizer_for(&server).transcribe(audio()).await;

    assert!(matches!(result, Err(RecognizerError::AuthenticationError(ref m)) if m == "bad key"));
}

#[tokio::test]
async fn test_transcribe_withRateLimit_shouldRetryThenFail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let result = recognizer_for(&server).transcribe(audio()).await;

    assert!(matches!(result, Err(RecognizerError::RateLimitExceeded(_))));
}

#[tokio::test]
async fn test_transcribe_withServerError_shouldNotRetry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("CUDA out of memory"))
        .expect(1)
        .mount(&server)
        .await;

    let result = recognizer_for(&server).transcribe(audio()).await;

    match result {
        Err(RecognizerError::ApiError { status_code, message }) => {
            assert_eq!(status_code, 500);
            assert_eq!(message, "CUDA out of memory");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_transcribe_withMalformedBody_shouldReturnParseError() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = recognizer_for(&server).transcribe(audio()).await;

    assert!(matches!(result, Err(RecognizerError::ParseError(_))));
}

#[tokio::test]
async fn test_transcribe_withEmptyAudio_shouldFailWithoutRequest() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = recognizer_for(&server).transcribe(AudioInput::new("empty.wav", Vec::new())).await;

    assert!(matches!(result, Err(RecognizerError::InvalidAudio(_))));
}

#[tokio::test]
async fn test_testConnection_shouldQueryModels() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    assert!(recognizer_for(&server).test_connection().await.is_ok());
}

#[tokio::test]
async fn test_transcribe_withUnreachableServer_shouldReturnConnectionError() {
    let recognizer = WhisperApiRecognizer::new("http://127.0.0.1:9/v1", "", "whisper-test", 5)
        .unwrap()
        .with_retries(0, 1);

    let result = recognizer.transcribe(audio()).await;

    assert!(matches!(result, Err(RecognizerError::ConnectionError(_))));
}
