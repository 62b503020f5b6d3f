//! Whisper API transcriber adapter
//!
//! Uploads the clip as a WAV file part to an OpenAI-compatible
//! `audio/transcriptions` endpoint.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::application::ports::{ApiError, Transcriber};
use crate::domain::audio::AudioClip;
use crate::domain::transcript::TranscriptText;
use crate::infrastructure::capture::encode_wav;

/// Default transcription model
const DEFAULT_MODEL: &str = "whisper-1";

/// API base URL
const API_BASE_URL: &str = "https://api.openai.com/v1";

/// Per-request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Whisper API transcriber
pub struct WhisperTranscriber {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl WhisperTranscriber {
    /// Create a new transcriber with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL)
    }

    /// Create a new transcriber with a custom model
    pub fn with_model(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: API_BASE_URL.to_string(),
            client: default_client(),
        }
    }

    /// Override the base URL (used for testing against a local server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the API URL
    fn api_url(&self) -> String {
        format!("{}/audio/transcriptions", self.base_url)
    }

    /// Build the multipart form for a clip
    fn build_form(&self, clip: &AudioClip) -> Result<Form, ApiError> {
        let wav = encode_wav(clip).map_err(|e| ApiError::Network(e.to_string()))?;

        let file_part = Part::bytes(wav)
            .file_name("clip.wav")
            .mime_str("audio/wav")
            .map_err(|e| ApiError::Network(format!("Failed to build request: {}", e)))?;

        Ok(Form::new()
            .part("file", file_part)
            .text("model", self.model.clone()))
    }
}

/// Shared HTTP client construction with the request timeout applied
fn default_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Map a reqwest transport failure to the API error taxonomy
pub(crate) fn map_transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(e.to_string())
    }
}

/// Map a non-success HTTP status plus body to the API error taxonomy
pub(crate) async fn map_status_error(response: reqwest::Response) -> ApiError {
    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return ApiError::InvalidApiKey;
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return ApiError::RateLimited;
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    ApiError::Http {
        status: status.as_u16(),
        message: message.trim().to_string(),
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, clip: &AudioClip) -> Result<TranscriptText, ApiError> {
        let form = self.build_form(clip)?;

        log::debug!(
            "uploading {} of audio to {}",
            clip.human_readable_size(),
            self.api_url()
        );

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            return Err(map_status_error(response).await);
        }

        let body: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;

        let transcript = TranscriptText::new(body.text);
        if transcript.is_empty() {
            return Err(ApiError::EmptyResponse);
        }

        Ok(transcript)
    }
}
