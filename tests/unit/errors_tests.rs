/*!
 * Tests for error types and conversions
 */

use srtscribe::errors::{AppError, ClientError, RecognizerError, ServiceError};

#[test]
fn test_recognizerError_apiError_shouldDisplayStatusAndMessage() {
    let error = RecognizerError::ApiError {
        status_code: 500,
        message: "model crashed".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("500"));
    assert!(display.contains("model crashed"));
}

#[test]
fn test_serviceError_fromRecognizer_shouldKeepMessageVerbatim() {
    let inner = RecognizerError::ConnectionError("refused".to_string());
    let expected = inner.to_string();

    let error: ServiceError = inner.into();

    assert_eq!(error.to_string(), expected);
}

#[test]
fn test_serviceError_missingFile_shouldNameField() {
    assert!(ServiceError::MissingFile.to_string().contains("'file'"));
}

#[test]
fn test_appError_fromLayers_shouldWrapVariant() {
    let error: AppError = ClientError::File("gone".to_string()).into();
    assert!(matches!(error, AppError::Client(_)));
    assert!(error.to_string().contains("gone"));

    let error: AppError = RecognizerError::InvalidAudio("empty".to_string()).into();
    assert!(matches!(error, AppError::Recognizer(_)));

    let error: AppError = ServiceError::MissingFile.into();
    assert!(matches!(error, AppError::Service(_)));
}

#[test]
fn test_appError_fromIoAndAnyhow_shouldConvert() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.wav");
    let error: AppError = io.into();
    assert!(matches!(error, AppError::File(_)));

    let error: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(error, AppError::Unknown(ref msg) if msg == "boom"));
}
