//! Chat-completion cleanup adapter
//!
//! Sends the raw transcript to an OpenAI-compatible `chat/completions`
//! endpoint with the fixed filler-word removal instruction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{ApiError, TextCleaner};
use crate::domain::transcript::{CleanupInstruction, TranscriptText};
use crate::infrastructure::transcription::whisper::{map_status_error, map_transport_error};

/// Default cleanup model
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// API base URL
const API_BASE_URL: &str = "https://api.openai.com/v1";

/// Per-request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Chat-completion text cleaner
pub struct ChatCleaner {
    api_key: String,
    model: String,
    base_url: String,
    instruction: CleanupInstruction,
    client: reqwest::Client,
}

impl ChatCleaner {
    /// Create a new cleaner with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL)
    }

    /// Create a new cleaner with a custom model
    pub fn with_model(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: API_BASE_URL.to_string(),
            instruction: CleanupInstruction::standard(),
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Override the base URL (used for testing against a local server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the API URL
    fn api_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Build the request body for a transcript
    fn build_request(&self, transcript: &TranscriptText) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: self.instruction.content().to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: transcript.as_str().to_string(),
                },
            ],
        }
    }

    /// Extract the assistant text from a response
    fn extract_text(response: ChatCompletionResponse) -> Option<String> {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
    }
}

#[async_trait]
impl TextCleaner for ChatCleaner {
    async fn clean(&self, transcript: &TranscriptText) -> Result<String, ApiError> {
        let body = self.build_request(transcript);

        log::debug!("requesting cleanup from {}", self.api_url());

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            return Err(map_status_error(response).await);
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;

        let text = Self::extract_text(body).ok_or(ApiError::EmptyResponse)?;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ApiError::EmptyResponse);
        }

        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_joins_base_and_path() {
        let cleaner = ChatCleaner::new("test-key");
        assert_eq!(
            cleaner.api_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn build_request_carries_instruction_and_transcript() {
        let cleaner = ChatCleaner::new("test-key");
        let transcript = TranscriptText::new("um hello world");

        let request = cleaner.build_request(&transcript);

        assert_eq!(request.model, "gpt-3.5-turbo");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert!(request.messages[0].content.contains("filler words"));
        assert_eq!(request.messages[1].role, "user");
        assert_eq!(request.messages[1].content, "um hello world");
    }

    #[test]
    fn extract_text_takes_first_choice() {
        let response = ChatCompletionResponse {
            choices: vec![ChatChoice {
                message: ChatResponseMessage {
                    content: Some("Hello world".to_string()),
                },
            }],
        };

        assert_eq!(
            ChatCleaner::extract_text(response),
            Some("Hello world".to_string())
        );
    }

    #[test]
    fn extract_text_empty_choices() {
        let response = ChatCompletionResponse { choices: vec![] };
        assert!(ChatCleaner::extract_text(response).is_none());
    }

    #[test]
    fn extract_text_missing_content() {
        let response = ChatCompletionResponse {
            choices: vec![ChatChoice {
                message: ChatResponseMessage { content: None },
            }],
        };
        assert!(ChatCleaner::extract_text(response).is_none());
    }

    #[test]
    fn base_url_override() {
        let cleaner = ChatCleaner::new("key").with_base_url("http://localhost:9000");
        assert_eq!(cleaner.api_url(), "http://localhost:9000/chat/completions");
    }
}
