//! Capture port interfaces

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::audio::{AudioClip, Duration};

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("No audio input device available")]
    NoInputDevice,

    #[error("Failed to open input stream: {0}")]
    StreamOpenFailed(String),

    #[error("Recording failed: {0}")]
    CaptureFailed(String),

    #[error("Recording already in progress")]
    AlreadyRecording,

    #[error("No recording in progress")]
    NotRecording,

    #[error("No audio captured")]
    EmptyCapture,
}

/// Progress callback type for reporting recording progress.
/// Parameters: (elapsed_ms, total_ms)
pub type ProgressCallback = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Port for bounded capture (fixed duration, one-shot mode)
#[async_trait]
pub trait ClipRecorder: Send + Sync {
    /// Record audio for a fixed duration.
    ///
    /// # Arguments
    /// * `duration` - How long to record
    /// * `on_progress` - Optional callback for progress updates
    ///
    /// # Returns
    /// The recorded clip or an error
    async fn record(
        &self,
        duration: Duration,
        on_progress: Option<ProgressCallback>,
    ) -> Result<AudioClip, CaptureError>;
}

/// Port for open-ended capture (user-controlled start/stop, daemon mode)
#[async_trait]
pub trait SessionRecorder: Send + Sync {
    /// Open the device stream and start buffering samples.
    async fn start(&self) -> Result<(), CaptureError>;

    /// Stop the recording and flush buffered samples into a clip.
    async fn stop(&self) -> Result<AudioClip, CaptureError>;

    /// Discard the recording without producing a clip.
    async fn cancel(&self) -> Result<(), CaptureError>;

    /// Check if currently recording
    fn is_recording(&self) -> bool;

    /// Get elapsed recording time in milliseconds
    fn elapsed_ms(&self) -> u64;
}
