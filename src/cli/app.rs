//! Main app runner for one-shot mode

use std::env;
use std::process::ExitCode;
use std::sync::{Arc, Mutex as StdMutex};

use crate::application::ports::{AudioCue, ConfigStore, Notifier};
use crate::application::{RecordOnceCallbacks, RecordOnceInput, RecordOnceUseCase};
use crate::domain::config::AppConfig;
use crate::infrastructure::{
    ArboardClipboard, CaptureSettings, ChatCleaner, CpalRecorder, NoOpAudioCue, NoOpNotifier,
    NotifyRustNotifier, RodioAudioCue, WhisperTranscriber, XdgConfigStore,
};

use super::args::OneshotOptions;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Run the one-shot dictation
pub async fn run_oneshot(options: OneshotOptions, config: &AppConfig) -> ExitCode {
    let presenter = Arc::new(StdMutex::new(Presenter::new()));

    // Load API key from env or config; abort before touching the microphone
    let api_key = match get_api_key().await {
        Ok(key) => key,
        Err(e) => {
            presenter.lock().unwrap_or_else(|e| e.into_inner()).error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    // Create adapters
    let recorder = CpalRecorder::new(CaptureSettings {
        sample_rate: config.sample_rate_or_default(),
        channels: config.channels_or_default(),
    });
    let transcriber = WhisperTranscriber::with_model(&api_key, config.stt_model_or_default());
    let cleaner = ChatCleaner::with_model(&api_key, config.cleanup_model_or_default());
    let clipboard = ArboardClipboard::new();
    let notifier: Box<dyn Notifier> = if options.notify {
        Box::new(NotifyRustNotifier::new())
    } else {
        Box::new(NoOpNotifier::new())
    };
    let audio_cue: Box<dyn AudioCue> = if options.audio_cue {
        Box::new(RodioAudioCue::new())
    } else {
        Box::new(NoOpAudioCue::new())
    };

    let use_case =
        RecordOnceUseCase::new(recorder, transcriber, cleaner, clipboard, notifier, audio_cue);

    let input = RecordOnceInput {
        duration: options.duration,
        enable_clipboard: options.clipboard,
        enable_notify: options.notify,
        enable_audio_cue: options.audio_cue,
    };

    let callbacks = RecordOnceCallbacks {
        on_progress: Some({
            let presenter = Arc::clone(&presenter);
            Arc::new(move |elapsed, total| {
                if let Ok(p) = presenter.lock() {
                    p.update_recording_progress(elapsed, total);
                }
            })
        }),
        on_recording_start: Some({
            let presenter = Arc::clone(&presenter);
            Box::new(move || {
                if let Ok(mut p) = presenter.lock() {
                    p.start_spinner("Recording...");
                }
            })
        }),
        on_recording_end: Some({
            let presenter = Arc::clone(&presenter);
            Box::new(move |size: &str| {
                if let Ok(mut p) = presenter.lock() {
                    p.spinner_success(&format!("Recording complete ({})", size));
                }
            })
        }),
        on_processing_start: Some({
            let presenter = Arc::clone(&presenter);
            Box::new(move || {
                if let Ok(mut p) = presenter.lock() {
                    p.start_spinner("Transcribing...");
                }
            })
        }),
        on_processing_end: Some({
            let presenter = Arc::clone(&presenter);
            Box::new(move || {
                if let Ok(mut p) = presenter.lock() {
                    p.spinner_success("Done");
                }
            })
        }),
    };

    match use_case.execute(input, callbacks).await {
        Ok(output) => {
            let presenter = presenter.lock().unwrap_or_else(|e| e.into_inner());

            if output.text.is_fallback() {
                presenter.warn("Cleanup unavailable, showing raw transcript");
            }

            // The result text goes to stdout
            presenter.output(output.text.as_str());

            if output.clipboard_copied {
                presenter.info("Copied to clipboard");
            }

            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            let mut presenter = presenter.lock().unwrap_or_else(|e| e.into_inner());
            presenter.stop_spinner();
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Get API key from environment or config file
pub async fn get_api_key() -> Result<String, String> {
    // Check environment first
    if let Ok(key) = env::var("OPENAI_API_KEY") {
        if !key.is_empty() {
            return Ok(key);
        }
    }

    // Check config file
    let store = XdgConfigStore::new();
    let config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    config.api_key.ok_or_else(|| {
        "Missing API key. Set OPENAI_API_KEY environment variable or run 'v2t config set api_key <key>'"
            .to_string()
    })
}

/// Build a config overlay from environment variables
fn env_config() -> AppConfig {
    let non_empty = |v: String| if v.is_empty() { None } else { Some(v) };

    AppConfig {
        api_key: env::var("OPENAI_API_KEY").ok().and_then(non_empty),
        stt_model: env::var("V2T_STT_MODEL").ok().and_then(non_empty),
        cleanup_model: env::var("V2T_CLEANUP_MODEL").ok().and_then(non_empty),
        sample_rate: env::var("V2T_SAMPLE_RATE").ok().and_then(|v| v.parse().ok()),
        channels: env::var("V2T_CHANNELS").ok().and_then(|v| v.parse().ok()),
        max_duration: env::var("V2T_MAX_DURATION").ok().and_then(non_empty),
        log_level: env::var("V2T_LOG").ok().and_then(non_empty),
        ..Default::default()
    }
}

/// Load and merge configuration from file, env, and CLI.
/// Precedence: defaults < file < environment < CLI.
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config())
        .merge(cli_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn merged_config_starts_from_defaults() {
        let merged = load_merged_config(AppConfig::empty()).await;
        assert!(merged.stt_model.is_some());
        assert!(merged.sample_rate.is_some());
    }

    #[tokio::test]
    async fn cli_config_wins_over_defaults() {
        let cli = AppConfig {
            sample_rate: Some(48_000),
            ..Default::default()
        };
        let merged = load_merged_config(cli).await;
        assert_eq!(merged.sample_rate, Some(48_000));
    }
}
