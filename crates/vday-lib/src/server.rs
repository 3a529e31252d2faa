//! HTTP server for the chronicles site.
//!
//! Serves the static SPA, the per-year narration clips (case-insensitive),
//! and the `/api/speak` synthesis proxy that keeps the ElevenLabs key
//! server-side. CORS-permissive; browsers only ever talk to this process.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::audio;
use crate::config::ServerConfig;
use crate::elevenlabs::{self, SpeakRejection};
use crate::files;

/// Shared handler state: the resolved configuration plus one reqwest
/// client reused across proxy calls.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
    client: reqwest::Client,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            client: reqwest::Client::new(),
        }
    }
}

/// Build the axum router over a shared [`AppState`].
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).options(preflight))
        .route("/audio/{name}", get(serve_audio).options(preflight))
        .route("/api/speak", post(speak).options(preflight))
        .route("/{*path}", get(serve_static).options(preflight))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Operator-facing summary, logged once after bind.
pub fn log_startup(config: &ServerConfig) {
    info!("V-Day Bahb Chronicles: http://localhost:{}", config.port);
    match audio::list_clips(&config.audio_dir) {
        Ok(files) => {
            let mp3s: Vec<String> = files
                .into_iter()
                .filter(|f| f.to_ascii_lowercase().ends_with(".mp3"))
                .collect();
            info!("audio folder: {}", config.audio_dir.display());
            if mp3s.is_empty() {
                info!("  mp3 files: none (add 2018_vday.mp3 … 2025_vday.mp3 here)");
            } else {
                info!("  mp3 files: {}", mp3s.join(", "));
            }
        }
        Err(_) => {
            info!(
                "audio folder not found at {}; create it or set AUDIO_DIR",
                config.audio_dir.display()
            );
        }
    }
    if config.voices.is_configured() {
        if config.voices.has_year_voices() {
            info!("ElevenLabs: enabled (per-year voices)");
        } else {
            info!("ElevenLabs: enabled");
        }
    } else {
        info!("ElevenLabs: not configured");
    }
}

/// 204 preflight with the permissive CORS trio.
async fn preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
}

async fn index(State(state): State<AppState>) -> Response {
    serve_public_file(&state, "").await
}

async fn serve_static(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    serve_public_file(&state, &path).await
}

async fn serve_public_file(state: &AppState, request_path: &str) -> Response {
    let Some(full) = files::resolve_static(&state.config.public_dir, request_path) else {
        return StatusCode::FORBIDDEN.into_response();
    };
    match tokio::fs::read(&full).await {
        Ok(bytes) => {
            let mime = files::mime_for(&full);
            ([(header::CONTENT_TYPE, mime)], bytes).into_response()
        }
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn serve_audio(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let Some(name) = audio::sanitize_clip_name(&name) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let dir = &state.config.audio_dir;
    let Some(path) = audio::resolve_clip(dir, name) else {
        audio::log_missing_clip(dir, name);
        return StatusCode::NOT_FOUND.into_response();
    };
    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, files::mime_for(&path))], bytes).into_response(),
        Err(_) => {
            audio::log_missing_clip(dir, name);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

async fn speak(State(state): State<AppState>, body: String) -> Response {
    let job = match elevenlabs::validate(&state.config.voices, &body) {
        Ok(job) => job,
        Err(rejection) => return rejection_response(rejection),
    };
    match elevenlabs::synthesize(&state.client, &job).await {
        Ok(upstream) => {
            let status = upstream.status();
            let content_type = upstream
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or(elevenlabs::DEFAULT_AUDIO_MIME)
                .to_string();
            (
                status,
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_string()),
                ],
                Body::from_stream(upstream.bytes_stream()),
            )
                .into_response()
        }
        Err(e) => {
            error!("synthesis proxy failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn rejection_response(rejection: SpeakRejection) -> Response {
    (
        rejection.status(),
        Json(serde_json::json!({ "error": rejection.message() })),
    )
        .into_response()
}
