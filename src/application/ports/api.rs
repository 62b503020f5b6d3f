//! Shared error taxonomy for the hosted API clients

use thiserror::Error;

/// Errors from the speech-to-text and cleanup services.
///
/// The taxonomy distinguishes transient failures (connectivity, timeouts,
/// throttling, server-side errors), which the retry layer may replay, from
/// rejections and malformed responses, which surface immediately.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API request failed: HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Failed to parse API response: {0}")]
    MalformedResponse(String),

    #[error("Empty response from API")]
    EmptyResponse,
}

impl ApiError {
    /// Whether a retry with backoff may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout | Self::Network(_) | Self::RateLimited => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
