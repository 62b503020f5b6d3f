//! Interactive session use case for daemon mode
//!
//! Owns the session state machine and the last produced text. Start/stop
//! requests that arrive in the wrong state are no-ops so repeated commands
//! (double hotkey presses, racing clients) cannot corrupt the session.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::audio::Duration;
use crate::domain::session::{InvalidTransition, Session, SessionSnapshot, SessionState};
use crate::domain::transcript::CleanedText;

use super::pipeline;
use super::ports::{
    ApiError, AudioCue, AudioCueType, CaptureError, Clipboard, NotificationIcon, Notifier,
    SessionRecorder, TextCleaner, Transcriber,
};
use super::retry::RetryPolicy;

/// Application name used in notifications
const APP_TITLE: &str = "V2T";

/// Errors from the session use case
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Recording failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Transcription failed: {0}")]
    Api(#[from] ApiError),

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
}

/// Configuration for the session use case
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Safety limit for a single recording
    pub max_duration: Duration,
    /// Whether to copy results to the clipboard automatically
    pub enable_clipboard: bool,
    /// Whether to show desktop notifications
    pub enable_notify: bool,
    /// Whether to play audio cues
    pub enable_audio_cue: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            max_duration: Duration::default_max_duration(),
            enable_clipboard: false,
            enable_notify: false,
            enable_audio_cue: false,
        }
    }
}

/// Output from one completed record-to-display cycle
#[derive(Debug, Clone)]
pub struct SessionOutput {
    /// The final text (cleaned, or raw transcript on cleanup fallback)
    pub text: CleanedText,
    /// Whether clipboard copy succeeded
    pub clipboard_copied: bool,
    /// Recorded clip size in human-readable format
    pub clip_size: String,
}

/// Session use case
pub struct SessionUseCase<R, T, L, C, N, A>
where
    R: SessionRecorder,
    T: Transcriber,
    L: TextCleaner,
    C: Clipboard,
    N: Notifier,
    A: AudioCue,
{
    recorder: R,
    transcriber: T,
    cleaner: L,
    clipboard: C,
    notifier: N,
    audio_cue: A,
    policy: RetryPolicy,
    options: SessionOptions,
    session: Arc<Mutex<Session>>,
    text: Arc<Mutex<Option<CleanedText>>>,
}

impl<R, T, L, C, N, A> SessionUseCase<R, T, L, C, N, A>
where
    R: SessionRecorder,
    T: Transcriber,
    L: TextCleaner,
    C: Clipboard,
    N: Notifier,
    A: AudioCue,
{
    /// Create a new session use case
    pub fn new(
        recorder: R,
        transcriber: T,
        cleaner: L,
        clipboard: C,
        notifier: N,
        audio_cue: A,
        options: SessionOptions,
    ) -> Self {
        Self {
            recorder,
            transcriber,
            cleaner,
            clipboard,
            notifier,
            audio_cue,
            policy: RetryPolicy::default(),
            options,
            session: Arc::new(Mutex::new(Session::new())),
            text: Arc::new(Mutex::new(None)),
        }
    }

    /// Override the retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Get a snapshot of the current state and text
    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.session.lock().await.state();
        let text = self.text.lock().await.clone();
        SessionSnapshot {
            state,
            fallback: text.as_ref().is_some_and(|t| t.is_fallback()),
            text: text.map(|t| t.into_string()),
        }
    }

    /// Get the current state
    pub async fn state(&self) -> SessionState {
        self.session.lock().await.state()
    }

    /// Begin a new recording.
    ///
    /// Returns Ok(false) without touching anything when a recording or
    /// pipeline run is already in flight.
    pub async fn start(&self) -> Result<bool, SessionError> {
        {
            let mut session = self.session.lock().await;
            if session.is_active() {
                log::debug!("start ignored: session is {}", session.state());
                return Ok(false);
            }
            session.start()?;
        }

        // A new cycle begins; the previous cycle's text is gone
        self.text.lock().await.take();

        if self.options.enable_notify {
            let _ = self
                .notifier
                .notify(APP_TITLE, "Recording...", NotificationIcon::Recording)
                .await;
        }

        if self.options.enable_audio_cue {
            let _ = self.audio_cue.play(AudioCueType::RecordingStart).await;
        }

        if let Err(e) = self.recorder.start().await {
            let mut session = self.session.lock().await;
            session.fail()?;
            if self.options.enable_notify {
                let _ = self
                    .notifier
                    .notify(APP_TITLE, &e.to_string(), NotificationIcon::Error)
                    .await;
            }
            return Err(e.into());
        }

        Ok(true)
    }

    /// Stop the recording and run the pipeline.
    ///
    /// Returns Ok(None) without touching anything when not recording.
    /// On unrecoverable failure the session moves to Error and the error
    /// is returned for presentation.
    pub async fn stop_and_process(&self) -> Result<Option<SessionOutput>, SessionError> {
        {
            let mut session = self.session.lock().await;
            if !session.is_recording() {
                log::debug!("stop ignored: session is {}", session.state());
                return Ok(None);
            }
            session.stop()?;
        }

        if self.options.enable_audio_cue {
            let _ = self.audio_cue.play(AudioCueType::RecordingStop).await;
        }

        let clip = match self.recorder.stop().await {
            Ok(clip) => clip,
            Err(e) => return Err(self.fail_with(e.into()).await),
        };

        let clip_size = clip.human_readable_size();
        log::info!(
            "captured {} ({:.1}s), starting pipeline",
            clip_size,
            clip.duration_secs()
        );

        if self.options.enable_notify {
            let _ = self
                .notifier
                .notify(APP_TITLE, "Transcribing...", NotificationIcon::Processing)
                .await;
        }

        let text = match pipeline::run(&self.transcriber, &self.cleaner, &self.policy, clip).await {
            Ok(text) => text,
            Err(e) => return Err(self.fail_with(e.into()).await),
        };

        *self.text.lock().await = Some(text.clone());

        {
            let mut session = self.session.lock().await;
            session.complete()?;
        }

        let clipboard_copied = if self.options.enable_clipboard {
            match self.clipboard.copy(text.as_str()).await {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("clipboard copy failed: {}", e);
                    false
                }
            }
        } else {
            false
        };

        if self.options.enable_notify {
            let message = if text.is_fallback() {
                "Done (cleanup unavailable, showing raw transcript)"
            } else {
                "Transcription complete!"
            };
            let _ = self
                .notifier
                .notify(APP_TITLE, message, NotificationIcon::Success)
                .await;
        }

        Ok(Some(SessionOutput {
            text,
            clipboard_copied,
            clip_size,
        }))
    }

    /// Move the session to Error and notify; returns the error for the caller
    async fn fail_with(&self, error: SessionError) -> SessionError {
        {
            let mut session = self.session.lock().await;
            if let Err(e) = session.fail() {
                log::error!("could not mark session failed: {}", e);
            }
        }

        if self.options.enable_notify {
            let _ = self
                .notifier
                .notify(APP_TITLE, &error.to_string(), NotificationIcon::Error)
                .await;
        }

        error
    }

    /// Abandon the current recording without transcribing.
    ///
    /// Returns Ok(false) when not recording.
    pub async fn cancel(&self) -> Result<bool, SessionError> {
        {
            let mut session = self.session.lock().await;
            if !session.is_recording() {
                return Ok(false);
            }
            session.cancel()?;
        }

        self.recorder.cancel().await?;

        if self.options.enable_audio_cue {
            let _ = self.audio_cue.play(AudioCueType::RecordingCancel).await;
        }

        if self.options.enable_notify {
            let _ = self
                .notifier
                .notify(APP_TITLE, "Recording cancelled", NotificationIcon::Warning)
                .await;
        }

        Ok(true)
    }

    /// Copy the last produced text to the clipboard.
    ///
    /// Returns Ok(false) when there is no text or the clipboard failed.
    pub async fn copy(&self) -> Result<bool, SessionError> {
        let text = self.text.lock().await.clone();
        let Some(text) = text else {
            return Ok(false);
        };

        match self.clipboard.copy(text.as_str()).await {
            Ok(()) => Ok(true),
            Err(e) => {
                log::warn!("clipboard copy failed: {}", e);
                Ok(false)
            }
        }
    }

    /// Reset the text and return to Idle.
    /// Invalid while a recording or pipeline run is in flight.
    pub async fn clear(&self) -> Result<(), SessionError> {
        {
            let mut session = self.session.lock().await;
            session.clear()?;
        }
        self.text.lock().await.take();
        Ok(())
    }

    /// Check if recording has exceeded the configured max duration
    pub fn exceeded_max_duration(&self) -> bool {
        self.recorder.is_recording()
            && self.recorder.elapsed_ms() >= self.options.max_duration.as_millis()
    }

    /// Get elapsed recording time in milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.recorder.elapsed_ms()
    }

    /// Check if currently recording
    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }
}
