//! Session command handler - sends commands to a running daemon via IPC

use super::args::SessionAction;
use super::ipc::create_ipc_client;
use super::presenter::Presenter;

/// Handle the session subcommand
pub async fn handle_session_command(
    action: SessionAction,
    presenter: &Presenter,
) -> Result<(), String> {
    let client = create_ipc_client();

    if !client.is_daemon_running() {
        return Err("No daemon running. Start with: v2t --daemon".to_string());
    }

    let cmd = match action {
        SessionAction::Start => "start",
        SessionAction::Stop => "stop",
        SessionAction::Cancel => "cancel",
        SessionAction::Copy => "copy",
        SessionAction::Clear => "clear",
        SessionAction::Show => "show",
        SessionAction::Status => "status",
    };

    let response = client
        .send_command(cmd)
        .await
        .map_err(|e| format!("Failed to communicate with daemon: {}", e))?;

    match action {
        SessionAction::Status => {
            presenter.info(&format!("Session: {}", response.trim()));
        }
        SessionAction::Show => {
            // The stored text goes to stdout verbatim
            presenter.output(response.trim_end_matches('\n'));
        }
        _ => {
            let response = response.trim();
            if let Some(stripped) = response.strip_prefix("error:") {
                return Err(stripped.trim().to_string());
            }
            presenter.info(&format!("Command sent: {}", cmd));
        }
    }

    Ok(())
}
