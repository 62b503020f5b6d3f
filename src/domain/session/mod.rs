//! Session state machine and snapshots.

pub mod session;

pub use session::{InvalidTransition, Session, SessionState};

/// Read-only view of a session for status rendering and IPC.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub state: SessionState,
    /// Last produced text, if any
    pub text: Option<String>,
    /// Whether the text is the raw transcript shown because cleanup failed
    pub fallback: bool,
}
