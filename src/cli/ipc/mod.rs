//! IPC (Inter-Process Communication) module for daemon control
//!
//! Provides platform-specific implementations:
//! - Unix (Linux/macOS): Unix Domain Sockets
//! - Windows: Named Pipes

#[cfg(windows)]
mod named_pipe;
#[cfg(unix)]
mod unix_socket;

#[cfg(windows)]
pub use named_pipe::{NamedPipeClient, NamedPipeServer, PipePath};
#[cfg(unix)]
pub use unix_socket::{SocketPath, UnixSocketClient, UnixSocketServer};

use std::io;
use tokio::sync::mpsc;

use super::signals::SessionCommand;
use crate::domain::session::SessionSnapshot;

/// Snapshot function type for IPC servers
pub type SnapshotFn = Box<dyn Fn() -> SessionSnapshot + Send + Sync>;

/// Trait for IPC servers that listen for session commands
#[async_trait::async_trait]
pub trait IpcServer: Send + Sync {
    /// Bind to the IPC endpoint
    fn bind(&mut self) -> io::Result<()>;

    /// Get the path/name of the IPC endpoint
    fn path(&self) -> String;

    /// Accept and handle connections
    ///
    /// This runs in a loop, accepting connections and processing commands.
    /// Each command is sent to the provided channel.
    /// The snapshot_fn is called to answer status and show queries.
    async fn run(&self, tx: mpsc::Sender<SessionCommand>, snapshot_fn: SnapshotFn)
        -> io::Result<()>;

    /// Cleanup IPC resources
    fn cleanup(&self);
}

/// Trait for IPC clients that send commands to the daemon
#[async_trait::async_trait]
pub trait IpcClient: Send + Sync {
    /// Check if daemon appears to be running (endpoint exists)
    fn is_daemon_running(&self) -> bool;

    /// Send a command and receive the full response
    async fn send_command(&self, cmd: &str) -> io::Result<String>;
}

/// Process one wire command and produce the response to write back.
/// Session commands are enqueued; queries answer from the snapshot.
pub(crate) async fn process_command(
    cmd: &str,
    tx: &mpsc::Sender<SessionCommand>,
    snapshot: SessionSnapshot,
) -> String {
    match cmd {
        "status" => format!("{}\n", snapshot.state),
        "show" => match snapshot.text {
            Some(text) => format!("{}\n", text),
            None => "\n".to_string(),
        },
        _ => match SessionCommand::parse(cmd) {
            Some(command) => {
                let _ = tx.send(command).await;
                "ok\n".to_string()
            }
            None => "error: unknown command\n".to_string(),
        },
    }
}

/// Create the appropriate IPC server for the current platform
#[cfg(unix)]
pub fn create_ipc_server() -> Box<dyn IpcServer> {
    Box::new(UnixSocketServer::new(SocketPath::new()))
}

#[cfg(windows)]
pub fn create_ipc_server() -> Box<dyn IpcServer> {
    Box::new(NamedPipeServer::new(PipePath::new()))
}

/// Create the appropriate IPC client for the current platform
#[cfg(unix)]
pub fn create_ipc_client() -> Box<dyn IpcClient> {
    Box::new(UnixSocketClient::new(SocketPath::new()))
}

#[cfg(windows)]
pub fn create_ipc_client() -> Box<dyn IpcClient> {
    Box::new(NamedPipeClient::new(PipePath::new()))
}
