//! The transcribe-then-clean pipeline
//!
//! Runs the two API stages sequentially. The clip is dropped as soon as the
//! transcription stage returns; it never outlives that call. Cleanup failures
//! degrade to the raw transcript instead of failing the session.

use super::ports::{ApiError, TextCleaner, Transcriber};
use super::retry::{with_retry, RetryPolicy};
use crate::domain::audio::AudioClip;
use crate::domain::transcript::CleanedText;

/// Run the full pipeline on a recorded clip.
///
/// Errors surface only from the transcription stage; a failed cleanup stage
/// yields the untouched transcript marked as a fallback.
pub async fn run<T, L>(
    transcriber: &T,
    cleaner: &L,
    policy: &RetryPolicy,
    clip: AudioClip,
) -> Result<CleanedText, ApiError>
where
    T: Transcriber,
    L: TextCleaner,
{
    let transcript = with_retry(policy, || transcriber.transcribe(&clip)).await?;
    drop(clip);

    match with_retry(policy, || cleaner.clean(&transcript)).await {
        Ok(text) => Ok(CleanedText::cleaned(text)),
        Err(e) => {
            log::warn!("cleanup failed, presenting raw transcript: {}", e);
            Ok(CleanedText::fallback(transcript))
        }
    }
}
