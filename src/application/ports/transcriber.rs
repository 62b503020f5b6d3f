//! Transcription port interface

use async_trait::async_trait;

use super::api::ApiError;
use crate::domain::audio::AudioClip;
use crate::domain::transcript::TranscriptText;

/// Port for speech-to-text transcription
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a recorded clip to raw text.
    ///
    /// # Arguments
    /// * `clip` - The audio to transcribe
    ///
    /// # Returns
    /// The raw transcript or an error
    async fn transcribe(&self, clip: &AudioClip) -> Result<TranscriptText, ApiError>;
}
