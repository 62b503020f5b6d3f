//! Text cleanup port interface

use async_trait::async_trait;

use super::api::ApiError;
use crate::domain::transcript::TranscriptText;

/// Port for language-model text cleanup
#[async_trait]
pub trait TextCleaner: Send + Sync {
    /// Remove filler words from a raw transcript.
    ///
    /// # Arguments
    /// * `transcript` - The raw transcript to clean
    ///
    /// # Returns
    /// The cleaned text or an error. Callers fall back to the raw
    /// transcript on failure; this port never does that itself.
    async fn clean(&self, transcript: &TranscriptText) -> Result<String, ApiError>;
}
