//! One-shot dictation use case: bounded recording, then the pipeline.

use thiserror::Error;

use crate::domain::audio::Duration;
use crate::domain::transcript::CleanedText;

use super::pipeline;
use super::ports::{
    ApiError, AudioCue, AudioCueType, CaptureError, Clipboard, ClipRecorder, NotificationIcon,
    Notifier, ProgressCallback, TextCleaner, Transcriber,
};
use super::retry::RetryPolicy;

/// Application name used in notifications
const APP_TITLE: &str = "V2T";

/// Errors from the one-shot use case
#[derive(Debug, Error)]
pub enum OneshotError {
    #[error("Recording failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Transcription failed: {0}")]
    Api(#[from] ApiError),
}

/// Input parameters for the one-shot use case
#[derive(Debug, Clone)]
pub struct RecordOnceInput {
    /// Recording duration
    pub duration: Duration,
    /// Whether to copy the result to the clipboard
    pub enable_clipboard: bool,
    /// Whether to show desktop notifications
    pub enable_notify: bool,
    /// Whether to play audio cues
    pub enable_audio_cue: bool,
}

impl Default for RecordOnceInput {
    fn default() -> Self {
        Self {
            duration: Duration::default_duration(),
            enable_clipboard: false,
            enable_notify: false,
            enable_audio_cue: false,
        }
    }
}

/// Output from the one-shot use case
#[derive(Debug, Clone)]
pub struct RecordOnceOutput {
    /// The final text (cleaned, or raw transcript on cleanup fallback)
    pub text: CleanedText,
    /// Whether clipboard copy succeeded (if enabled)
    pub clipboard_copied: bool,
    /// Recorded clip size in human-readable format
    pub clip_size: String,
}

/// Callbacks for progress and status updates
#[derive(Default)]
pub struct RecordOnceCallbacks {
    /// Called during recording with (elapsed_ms, total_ms)
    pub on_progress: Option<ProgressCallback>,
    /// Called when recording starts
    pub on_recording_start: Option<Box<dyn Fn() + Send + Sync>>,
    /// Called when recording ends with the clip size
    pub on_recording_end: Option<Box<dyn Fn(&str) + Send + Sync>>,
    /// Called when the pipeline starts
    pub on_processing_start: Option<Box<dyn Fn() + Send + Sync>>,
    /// Called when the pipeline ends
    pub on_processing_end: Option<Box<dyn Fn() + Send + Sync>>,
}

/// One-shot dictation use case
pub struct RecordOnceUseCase<R, T, L, C, N, A>
where
    R: ClipRecorder,
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
}

impl<R, T, L, C, N, A> RecordOnceUseCase<R, T, L, C, N, A>
where
    R: ClipRecorder,
    T: Transcriber,
    L: TextCleaner,
    C: Clipboard,
    N: Notifier,
    A: AudioCue,
{
    /// Create a new use case instance
    pub fn new(
        recorder: R,
        transcriber: T,
        cleaner: L,
        clipboard: C,
        notifier: N,
        audio_cue: A,
    ) -> Self {
        Self {
            recorder,
            transcriber,
            cleaner,
            clipboard,
            notifier,
            audio_cue,
            policy: RetryPolicy::default(),
        }
    }

    /// Override the retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Execute the dictation workflow
    pub async fn execute(
        &self,
        input: RecordOnceInput,
        callbacks: RecordOnceCallbacks,
    ) -> Result<RecordOnceOutput, OneshotError> {
        if input.enable_notify {
            let _ = self
                .notifier
                .notify(
                    APP_TITLE,
                    &format!("Recording for {}...", input.duration),
                    NotificationIcon::Recording,
                )
                .await;
        }

        if input.enable_audio_cue {
            let _ = self.audio_cue.play(AudioCueType::RecordingStart).await;
        }

        if let Some(ref cb) = callbacks.on_recording_start {
            cb();
        }

        let clip = self
            .recorder
            .record(input.duration, callbacks.on_progress)
            .await?;

        let clip_size = clip.human_readable_size();

        if input.enable_audio_cue {
            let _ = self.audio_cue.play(AudioCueType::RecordingStop).await;
        }

        if let Some(ref cb) = callbacks.on_recording_end {
            cb(&clip_size);
        }

        if input.enable_notify {
            let _ = self
                .notifier
                .notify(APP_TITLE, "Transcribing...", NotificationIcon::Processing)
                .await;
        }

        if let Some(ref cb) = callbacks.on_processing_start {
            cb();
        }

        let text = match pipeline::run(&self.transcriber, &self.cleaner, &self.policy, clip).await {
            Ok(text) => text,
            Err(e) => {
                if input.enable_notify {
                    let _ = self
                        .notifier
                        .notify(APP_TITLE, &e.to_string(), NotificationIcon::Error)
                        .await;
                }
                return Err(e.into());
            }
        };

        if let Some(ref cb) = callbacks.on_processing_end {
            cb();
        }

        // Output actions are non-fatal
        let clipboard_copied = if input.enable_clipboard {
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

        if input.enable_notify {
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

        Ok(RecordOnceOutput {
            text,
            clipboard_copied,
            clip_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audio::AudioClip;
    use crate::domain::transcript::TranscriptText;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    struct MockRecorder;

    #[async_trait]
    impl ClipRecorder for MockRecorder {
        async fn record(
            &self,
            _duration: Duration,
            _on_progress: Option<ProgressCallback>,
        ) -> Result<AudioClip, CaptureError> {
            Ok(AudioClip::new(vec![0i16; 1600], 16_000, 1))
        }
    }

    struct FailingRecorder;

    #[async_trait]
    impl ClipRecorder for FailingRecorder {
        async fn record(
            &self,
            _duration: Duration,
            _on_progress: Option<ProgressCallback>,
        ) -> Result<AudioClip, CaptureError> {
            Err(CaptureError::NoInputDevice)
        }
    }

    struct MockTranscriber;

    #[async_trait]
    impl Transcriber for MockTranscriber {
        async fn transcribe(&self, _clip: &AudioClip) -> Result<TranscriptText, ApiError> {
            Ok(TranscriptText::new("um so basically hello world"))
        }
    }

    struct MockCleaner;

    #[async_trait]
    impl TextCleaner for MockCleaner {
        async fn clean(&self, _transcript: &TranscriptText) -> Result<String, ApiError> {
            Ok("Hello world".to_string())
        }
    }

    struct FailingCleaner;

    #[async_trait]
    impl TextCleaner for FailingCleaner {
        async fn clean(&self, _transcript: &TranscriptText) -> Result<String, ApiError> {
            Err(ApiError::Http {
                status: 502,
                message: "bad gateway".into(),
            })
        }
    }

    #[derive(Default)]
    struct MockClipboard {
        contents: StdMutex<Option<String>>,
    }

    #[async_trait]
    impl Clipboard for MockClipboard {
        async fn copy(&self, text: &str) -> Result<(), super::super::ports::ClipboardError> {
            *self.contents.lock().unwrap() = Some(text.to_string());
            Ok(())
        }
    }

    struct MockNotifier;

    #[async_trait]
    impl Notifier for MockNotifier {
        async fn notify(
            &self,
            _title: &str,
            _message: &str,
            _icon: NotificationIcon,
        ) -> Result<(), super::super::ports::NotificationError> {
            Ok(())
        }
    }

    struct MockCue;

    #[async_trait]
    impl AudioCue for MockCue {
        async fn play(&self, _cue: AudioCueType) -> Result<(), super::super::ports::AudioCueError> {
            Ok(())
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(3, std::time::Duration::from_millis(1))
    }

    #[tokio::test]
    async fn execute_displays_cleaned_text() {
        let use_case = RecordOnceUseCase::new(
            MockRecorder,
            MockTranscriber,
            MockCleaner,
            MockClipboard::default(),
            MockNotifier,
            MockCue,
        )
        .with_retry_policy(fast_policy());

        let output = use_case
            .execute(RecordOnceInput::default(), RecordOnceCallbacks::default())
            .await
            .unwrap();

        assert_eq!(output.text.as_str(), "Hello world");
        assert!(!output.text.is_fallback());
        assert!(!output.clipboard_copied); // Not enabled
    }

    #[tokio::test]
    async fn execute_with_clipboard_enabled() {
        let clipboard = MockClipboard::default();
        let use_case = RecordOnceUseCase::new(
            MockRecorder,
            MockTranscriber,
            MockCleaner,
            clipboard,
            MockNotifier,
            MockCue,
        )
        .with_retry_policy(fast_policy());

        let input = RecordOnceInput {
            enable_clipboard: true,
            ..Default::default()
        };

        let output = use_case
            .execute(input, RecordOnceCallbacks::default())
            .await
            .unwrap();

        assert!(output.clipboard_copied);
    }

    #[tokio::test]
    async fn cleanup_failure_presents_raw_transcript() {
        let use_case = RecordOnceUseCase::new(
            MockRecorder,
            MockTranscriber,
            FailingCleaner,
            MockClipboard::default(),
            MockNotifier,
            MockCue,
        )
        .with_retry_policy(fast_policy());

        let output = use_case
            .execute(RecordOnceInput::default(), RecordOnceCallbacks::default())
            .await
            .unwrap();

        assert_eq!(output.text.as_str(), "um so basically hello world");
        assert!(output.text.is_fallback());
    }

    #[tokio::test]
    async fn device_error_aborts() {
        let use_case = RecordOnceUseCase::new(
            FailingRecorder,
            MockTranscriber,
            MockCleaner,
            MockClipboard::default(),
            MockNotifier,
            MockCue,
        );

        let result = use_case
            .execute(RecordOnceInput::default(), RecordOnceCallbacks::default())
            .await;

        assert!(matches!(
            result,
            Err(OneshotError::Capture(CaptureError::NoInputDevice))
        ));
    }
}
