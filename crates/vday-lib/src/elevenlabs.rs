//! ElevenLabs synthesis: speak-request validation and the upstream call.
//!
//! The API key lives in the server configuration and is injected here; it
//! never appears in anything sent back to the browser.

use axum::http::StatusCode;
use serde::Deserialize;

use crate::config::VoiceConfig;

pub const TTS_ENDPOINT: &str = "https://api.elevenlabs.io/v1/text-to-speech";
pub const MODEL_ID: &str = "eleven_multilingual_v2";
pub const OUTPUT_FORMAT: &str = "mp3_44100_128";
/// Content-type assumed when the upstream omits one.
pub const DEFAULT_AUDIO_MIME: &str = "audio/mpeg";

/// Body of `POST /api/speak`.
#[derive(Debug, Deserialize)]
pub struct SpeakRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub year: Option<YearField>,
}

/// `year` arrives as either a JSON number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum YearField {
    Number(u16),
    Text(String),
}

impl YearField {
    /// The year as a table key, when it parses as one.
    pub fn as_year(&self) -> Option<u16> {
        match self {
            YearField::Number(n) => Some(*n),
            YearField::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// The four rejections, in check order. Each maps to a status code and a
/// JSON `{ "error": … }` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakRejection {
    NotConfigured,
    InvalidJson,
    NoVoice,
    MissingText,
}

impl SpeakRejection {
    pub fn status(self) -> StatusCode {
        match self {
            SpeakRejection::NotConfigured | SpeakRejection::NoVoice => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            SpeakRejection::InvalidJson | SpeakRejection::MissingText => StatusCode::BAD_REQUEST,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            SpeakRejection::NotConfigured => {
                "ElevenLabs not configured. Set ELEVENLABS_API_KEY in .env"
            }
            SpeakRejection::InvalidJson => "Invalid JSON",
            SpeakRejection::NoVoice => {
                "No voice for this year. Set ELEVENLABS_VOICE_ID or ELEVENLABS_VOICE_2018 … ELEVENLABS_VOICE_2025 in .env"
            }
            SpeakRejection::MissingText => "Missing or empty \"text\"",
        }
    }
}

/// A validated synthesis request, ready to send upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakJob {
    pub api_key: String,
    pub voice_id: String,
    pub text: String,
}

/// Validate a raw request body against the voice configuration. The check
/// order is key, body, voice, text; the first failure wins.
pub fn validate(voices: &VoiceConfig, body: &str) -> Result<SpeakJob, SpeakRejection> {
    let Some(api_key) = voices.api_key.as_deref() else {
        return Err(SpeakRejection::NotConfigured);
    };
    let req: SpeakRequest =
        serde_json::from_str(body).map_err(|_| SpeakRejection::InvalidJson)?;
    let year = req.year.as_ref().and_then(YearField::as_year);
    let Some(voice_id) = voices.voice_for_year(year) else {
        return Err(SpeakRejection::NoVoice);
    };
    let text = req.text.as_deref().map(str::trim).unwrap_or("");
    if text.is_empty() {
        return Err(SpeakRejection::MissingText);
    }
    Ok(SpeakJob {
        api_key: api_key.to_string(),
        voice_id: voice_id.to_string(),
        text: text.to_string(),
    })
}

fn synthesis_url(voice_id: &str) -> String {
    format!("{TTS_ENDPOINT}/{voice_id}?output_format={OUTPUT_FORMAT}")
}

/// POST the synthesis request upstream. The caller streams the response
/// (status and body passed through verbatim).
pub async fn synthesize(
    client: &reqwest::Client,
    job: &SpeakJob,
) -> Result<reqwest::Response, String> {
    client
        .post(synthesis_url(&job.voice_id))
        .header("xi-api-key", &job.api_key)
        .json(&serde_json::json!({ "text": job.text, "model_id": MODEL_ID }))
        .send()
        .await
        .map_err(|e| format!("synthesis request failed: {e}"))
}
