//! Signal handling and the daemon command channel

use tokio::sync::mpsc;

/// Commands the daemon loop reacts to, whether they arrive over IPC
/// or from OS signals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Start a new recording
    Start,
    /// Stop recording and run the pipeline
    Stop,
    /// Discard the current recording
    Cancel,
    /// Copy the last text to the clipboard
    Copy,
    /// Clear the last text and return to idle
    Clear,
    /// Shut the daemon down (SIGINT/SIGTERM)
    Shutdown,
}

impl SessionCommand {
    /// Parse a wire command name
    pub fn parse(cmd: &str) -> Option<Self> {
        match cmd {
            "start" => Some(Self::Start),
            "stop" => Some(Self::Stop),
            "cancel" => Some(Self::Cancel),
            "copy" => Some(Self::Copy),
            "clear" => Some(Self::Clear),
            _ => None,
        }
    }

    /// Wire command name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Cancel => "cancel",
            Self::Copy => "copy",
            Self::Clear => "clear",
            Self::Shutdown => "shutdown",
        }
    }
}

/// Daemon signal handler
///
/// Handles OS shutdown signals and provides a channel for receiving session
/// commands from other sources (the IPC server).
pub struct DaemonSignalHandler {
    receiver: mpsc::Receiver<SessionCommand>,
}

impl DaemonSignalHandler {
    /// Create a new handler and start listening for shutdown signals.
    ///
    /// Returns the handler and a sender the IPC server uses to feed
    /// commands into the daemon loop.
    pub fn new() -> (Self, mpsc::Sender<SessionCommand>) {
        let (tx, rx) = mpsc::channel(10);

        let tx_int = tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::info!("received interrupt, shutting down");
                let _ = tx_int.send(SessionCommand::Shutdown).await;
            }
        });

        #[cfg(unix)]
        {
            let tx_term = tx.clone();
            tokio::spawn(async move {
                use tokio::signal::unix::{signal, SignalKind};
                let Ok(mut sigterm) = signal(SignalKind::terminate()) else {
                    return;
                };
                sigterm.recv().await;
                log::info!("received SIGTERM, shutting down");
                let _ = tx_term.send(SessionCommand::Shutdown).await;
            });
        }

        (Self { receiver: rx }, tx)
    }

    /// Wait for the next command
    pub async fn recv(&mut self) -> Option<SessionCommand> {
        self.receiver.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_parse_round_trips() {
        for cmd in [
            SessionCommand::Start,
            SessionCommand::Stop,
            SessionCommand::Cancel,
            SessionCommand::Copy,
            SessionCommand::Clear,
        ] {
            assert_eq!(SessionCommand::parse(cmd.as_str()), Some(cmd));
        }
    }

    #[test]
    fn command_parse_rejects_unknown() {
        assert_eq!(SessionCommand::parse("toggle"), None);
        assert_eq!(SessionCommand::parse(""), None);
        // Shutdown only comes from signals, not the wire
        assert_eq!(SessionCommand::parse("shutdown"), None);
    }
}
