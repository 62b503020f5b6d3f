//! Daemon app runner
//!
//! Long-lived process owning the session. Commands arrive over IPC (and OS
//! signals for shutdown); the pipeline runs on a spawned task so the command
//! loop stays responsive, and results are posted back over a channel.

use std::process::ExitCode;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::application::ports::{
    AudioCue, Clipboard, Notifier, SessionRecorder, TextCleaner, Transcriber,
};
use crate::application::{SessionOptions, SessionOutput, SessionUseCase};
use crate::domain::config::AppConfig;
use crate::domain::session::SessionSnapshot;
use crate::infrastructure::{
    ArboardClipboard, CaptureSettings, ChatCleaner, CpalRecorder, NoOpAudioCue, NoOpNotifier,
    NotifyRustNotifier, RodioAudioCue, WhisperTranscriber,
};

use super::app::{get_api_key, EXIT_ERROR};
use super::args::DaemonOptions;
use super::ipc::create_ipc_server;
use super::presenter::Presenter;
use super::signals::{DaemonSignalHandler, SessionCommand};

/// Result of one pipeline run, posted back to the daemon loop
enum PipelineEvent {
    Finished(SessionOutput),
    Failed(String),
}

/// Run daemon mode
pub async fn run_daemon(options: DaemonOptions, config: &AppConfig) -> ExitCode {
    let presenter = Presenter::new();

    // Single-instance guard (Unix)
    #[cfg(unix)]
    let pid_file = {
        use super::pid_file::{PidFile, PidFileError};

        let pid_file = PidFile::new();
        if let Err(e) = pid_file.acquire() {
            match e {
                PidFileError::AlreadyRunning(pid) => {
                    presenter.error(&format!("Another daemon is already running (PID: {})", pid));
                }
                _ => presenter.error(&e.to_string()),
            }
            return ExitCode::from(EXIT_ERROR);
        }
        pid_file
    };

    // Load API key
    let api_key = match get_api_key().await {
        Ok(key) => key,
        Err(e) => {
            presenter.error(&e);
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

    let session_options = SessionOptions {
        max_duration: options.max_duration,
        enable_clipboard: options.clipboard,
        enable_notify: options.notify,
        enable_audio_cue: options.audio_cue,
    };

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

    let use_case = Arc::new(SessionUseCase::new(
        recorder,
        transcriber,
        cleaner,
        ArboardClipboard::new(),
        notifier,
        audio_cue,
        session_options,
    ));

    // Signal handler provides the command channel the IPC server feeds
    let (mut signals, command_tx) = DaemonSignalHandler::new();

    // Snapshot mirror answering IPC status/show queries without touching
    // the async session state from the IPC task
    let snapshot = Arc::new(StdMutex::new(SessionSnapshot::default()));

    let mut ipc_server = create_ipc_server();
    if let Err(e) = ipc_server.bind() {
        presenter.error(&format!("Failed to bind IPC endpoint: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }
    let ipc_path = ipc_server.path();

    {
        let snapshot = Arc::clone(&snapshot);
        tokio::spawn(async move {
            let snapshot_fn = Box::new(move || {
                snapshot
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .clone()
            });
            if let Err(e) = ipc_server.run(command_tx, snapshot_fn).await {
                log::error!("IPC server failed: {}", e);
            }
        });
    }

    presenter.daemon_status("Started, waiting for commands...");
    presenter.info(&format!(
        "PID: {} | IPC: {} | Ctrl+C: exit",
        std::process::id(),
        ipc_path
    ));

    daemon_loop(Arc::clone(&use_case), &mut signals, &presenter, &snapshot).await;

    #[cfg(unix)]
    let _ = pid_file.release();

    presenter.daemon_status("Stopped");
    ExitCode::SUCCESS
}

/// Main command loop
async fn daemon_loop<R, T, L, C, N, A>(
    use_case: Arc<SessionUseCase<R, T, L, C, N, A>>,
    signals: &mut DaemonSignalHandler,
    presenter: &Presenter,
    snapshot: &Arc<StdMutex<SessionSnapshot>>,
) where
    R: SessionRecorder + 'static,
    T: Transcriber + 'static,
    L: TextCleaner + 'static,
    C: Clipboard + 'static,
    N: Notifier + 'static,
    A: AudioCue + 'static,
{
    let (event_tx, mut event_rx) = mpsc::channel::<PipelineEvent>(4);
    let mut processing_task: Option<JoinHandle<()>> = None;
    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(1));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            command = signals.recv() => {
                let Some(command) = command else { break };
                match command {
                    SessionCommand::Start => match use_case.start().await {
                        Ok(true) => presenter.daemon_status("recording"),
                        Ok(false) => log::debug!("start ignored, session active"),
                        Err(e) => presenter.error(&e.to_string()),
                    },
                    SessionCommand::Stop => {
                        processing_task =
                            spawn_pipeline(&use_case, &event_tx, processing_task.take());
                        presenter.daemon_status("processing");
                    }
                    SessionCommand::Cancel => match use_case.cancel().await {
                        Ok(true) => presenter.daemon_status("cancelled"),
                        Ok(false) => log::debug!("cancel ignored, not recording"),
                        Err(e) => presenter.error(&e.to_string()),
                    },
                    SessionCommand::Copy => match use_case.copy().await {
                        Ok(true) => presenter.info("Copied to clipboard"),
                        Ok(false) => presenter.warn("Nothing to copy"),
                        Err(e) => presenter.error(&e.to_string()),
                    },
                    SessionCommand::Clear => match use_case.clear().await {
                        Ok(()) => presenter.daemon_status("idle"),
                        Err(e) => presenter.error(&e.to_string()),
                    },
                    SessionCommand::Shutdown => {
                        // Dropping the task aborts any in-flight API call;
                        // nothing is persisted, so the session simply ends.
                        if let Some(task) = processing_task.take() {
                            task.abort();
                        }
                        break;
                    }
                }
            }

            Some(event) = event_rx.recv() => {
                processing_task = None;
                match event {
                    PipelineEvent::Finished(output) => {
                        if output.text.is_fallback() {
                            presenter.warn("Cleanup unavailable, showing raw transcript");
                        }
                        presenter.output(output.text.as_str());
                        if output.clipboard_copied {
                            presenter.info("Copied to clipboard");
                        }
                        presenter.daemon_status("complete");
                    }
                    PipelineEvent::Failed(message) => {
                        presenter.error(&message);
                        presenter.daemon_status("error");
                    }
                }
            }

            _ = ticker.tick() => {
                // Max-duration watchdog
                if use_case.exceeded_max_duration() {
                    presenter.warn("Max recording duration reached, stopping");
                    processing_task =
                        spawn_pipeline(&use_case, &event_tx, processing_task.take());
                }
            }
        }

        // Keep the IPC snapshot current
        let current = use_case.snapshot().await;
        *snapshot.lock().unwrap_or_else(|e| e.into_inner()) = current;
    }
}

/// Spawn the stop-and-process pipeline on its own task.
/// The use case itself ignores the request when not recording.
fn spawn_pipeline<R, T, L, C, N, A>(
    use_case: &Arc<SessionUseCase<R, T, L, C, N, A>>,
    event_tx: &mpsc::Sender<PipelineEvent>,
    previous: Option<JoinHandle<()>>,
) -> Option<JoinHandle<()>>
where
    R: SessionRecorder + 'static,
    T: Transcriber + 'static,
    L: TextCleaner + 'static,
    C: Clipboard + 'static,
    N: Notifier + 'static,
    A: AudioCue + 'static,
{
    // A pipeline already in flight keeps running; the use case rejects the
    // overlapping stop anyway
    if let Some(task) = &previous {
        if !task.is_finished() {
            return previous;
        }
    }

    let use_case = Arc::clone(use_case);
    let event_tx = event_tx.clone();

    Some(tokio::spawn(async move {
        match use_case.stop_and_process().await {
            Ok(Some(output)) => {
                let _ = event_tx.send(PipelineEvent::Finished(output)).await;
            }
            Ok(None) => {}
            Err(e) => {
                let _ = event_tx.send(PipelineEvent::Failed(e.to_string())).await;
            }
        }
    }))
}
