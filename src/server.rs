use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info, warn};
use tokio::sync::Mutex;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::app_config::{Config, ServerConfig};
use crate::errors::{RecognizerError, ServiceError};
use crate::grouping::GroupingConfig;
use crate::messages::{ServiceStatus, TranscriptionResponse};
use crate::recognizer::{AudioInput, Recognizer};
use crate::subtitle_processor::SubtitleCollection;

// @module: HTTP transcription service

/// Shared state of the transcription service
#[derive(Clone)]
pub struct AppState {
    recognizer: Arc<dyn Recognizer>,
    grouping: GroupingConfig,
    // Transcription jobs run one at a time
    job_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(recognizer: Arc<dyn Recognizer>, grouping: GroupingConfig) -> Self {
        Self {
            recognizer,
            grouping,
            job_lock: Arc::new(Mutex::new(())),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::MissingFile | ServiceError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            ServiceError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServiceError::Recognizer(RecognizerError::InvalidAudio(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Recognizer(_) => StatusCode::BAD_GATEWAY,
        };
        (status, self.to_string()).into_response()
    }
}

/// Build the service router
pub fn router(state: AppState, server_config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/transcribe/", post(transcribe))
        .route("/transcribe", post(transcribe))
        .layer(DefaultBodyLimit::max(server_config.max_upload_bytes))
        .layer(cors_layer(&server_config.allowed_origins))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

async fn root() -> Json<ServiceStatus> {
    Json(ServiceStatus::running())
}

async fn transcribe(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TranscriptionResponse>, ServiceError> {
    let started = Instant::now();

    let audio = read_audio_field(multipart).await?;
    let file_name = audio.file_name.clone();
    let size = audio.data.len();
    info!("Received '{}' ({} bytes)", file_name, size);

    let transcription = {
        let _job = state.job_lock.lock().await;
        state.recognizer.transcribe(audio).await.map_err(|e| {
            error!("Transcription of '{}' failed: {}", file_name, e);
            ServiceError::from(e)
        })?
    };

    let subtitles = SubtitleCollection::from_segments(&transcription.segments, &state.grouping);
    let processing_time = started.elapsed().as_secs_f64();

    info!(
        "Transcribed '{}' into {} cues in {:.2}s (language: {}, probability: {:.2})",
        file_name,
        subtitles.entries.len(),
        processing_time,
        transcription.language,
        transcription.language_probability
    );

    Ok(Json(TranscriptionResponse::success(
        transcription.language,
        transcription.language_probability,
        processing_time,
        subtitles.to_srt_string(),
    )))
}

/// Pull the `file` field out of the multipart form
async fn read_audio_field(mut multipart: Multipart) -> Result<AudioInput, ServiceError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(upload_error)?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("audio").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(upload_error)?;

        if data.is_empty() {
            return Err(ServiceError::InvalidUpload(format!("Uploaded file '{}' is empty", file_name)));
        }

        let mut audio = AudioInput::new(file_name, data);
        if let Some(content_type) = content_type {
            audio = audio.with_content_type(content_type);
        }
        return Ok(audio);
    }

    Err(ServiceError::MissingFile)
}

fn upload_error(error: MultipartError) -> ServiceError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServiceError::PayloadTooLarge(error.body_text())
    } else {
        ServiceError::InvalidUpload(error.body_text())
    }
}

/// Run the service until Ctrl-C
pub async fn serve(config: &Config, recognizer: Arc<dyn Recognizer>) -> Result<()> {
    let state = AppState::new(recognizer, config.grouping);
    let app = router(state, &config.server);

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!("Listening on http://{}", listener.local_addr().context("Failed to read local address")?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
