//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

use crate::domain::audio::Duration;

/// V2T - voice to text dictation
#[derive(Parser, Debug)]
#[command(name = "v2t")]
#[command(version)]
#[command(about = "Voice to text transcription with filler-word cleanup")]
#[command(long_about = None)]
pub struct Cli {
    /// Recording duration (e.g., 10s, 1m, 2m30s)
    #[arg(short = 'd', long, value_name = "TIME", conflicts_with = "daemon")]
    pub duration: Option<String>,

    /// Copy the result to the clipboard
    #[arg(short = 'c', long)]
    pub clipboard: bool,

    /// Show desktop notifications
    #[arg(short = 'n', long)]
    pub notify: bool,

    /// Play audio cues on record start/stop
    #[arg(long)]
    pub audio_cue: bool,

    /// Run as daemon (control via: v2t session start/stop/...)
    #[arg(long)]
    pub daemon: bool,

    /// Max recording duration for daemon mode
    #[arg(long, value_name = "TIME", requires = "daemon")]
    pub max_duration: Option<String>,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Send commands to a running daemon
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

/// Session control actions
#[derive(Subcommand, Debug, Clone, Copy)]
pub enum SessionAction {
    /// Start a new recording
    Start,
    /// Stop recording and run transcription + cleanup
    Stop,
    /// Discard the current recording without transcribing
    Cancel,
    /// Copy the last text to the clipboard
    Copy,
    /// Clear the last text and return to idle
    Clear,
    /// Print the last text
    Show,
    /// Show the session state
    Status,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Parsed one-shot options
#[derive(Debug, Clone)]
pub struct OneshotOptions {
    pub duration: Duration,
    pub clipboard: bool,
    pub notify: bool,
    pub audio_cue: bool,
}

/// Parsed daemon options
#[derive(Debug, Clone)]
pub struct DaemonOptions {
    pub max_duration: Duration,
    pub clipboard: bool,
    pub notify: bool,
    pub audio_cue: bool,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "api_key",
    "stt_model",
    "cleanup_model",
    "sample_rate",
    "channels",
    "max_duration",
    "clipboard",
    "notify",
    "audio_cue",
    "log_level",
];

/// Valid log level values
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["v2t"]);
        assert!(cli.duration.is_none());
        assert!(!cli.clipboard);
        assert!(!cli.notify);
        assert!(!cli.audio_cue);
        assert!(!cli.daemon);
        assert!(cli.max_duration.is_none());
    }

    #[test]
    fn cli_parses_duration() {
        let cli = Cli::parse_from(["v2t", "-d", "30s"]);
        assert_eq!(cli.duration, Some("30s".to_string()));
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::parse_from(["v2t", "-c", "-n", "--audio-cue"]);
        assert!(cli.clipboard);
        assert!(cli.notify);
        assert!(cli.audio_cue);
    }

    #[test]
    fn cli_parses_daemon() {
        let cli = Cli::parse_from(["v2t", "--daemon"]);
        assert!(cli.daemon);
    }

    #[test]
    fn cli_parses_daemon_with_max_duration() {
        let cli = Cli::parse_from(["v2t", "--daemon", "--max-duration", "5m"]);
        assert!(cli.daemon);
        assert_eq!(cli.max_duration, Some("5m".to_string()));
    }

    #[test]
    fn duration_conflicts_with_daemon() {
        let result = Cli::try_parse_from(["v2t", "--daemon", "-d", "30s"]);
        assert!(result.is_err());
    }

    #[test]
    fn max_duration_requires_daemon() {
        let result = Cli::try_parse_from(["v2t", "--max-duration", "5m"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parses_config_init() {
        let cli = Cli::parse_from(["v2t", "config", "init"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigAction::Init
            })
        ));
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["v2t", "config", "set", "sample_rate", "44100"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "sample_rate");
            assert_eq!(value, "44100");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn cli_parses_session_actions() {
        let cli = Cli::parse_from(["v2t", "session", "start"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Session {
                action: SessionAction::Start
            })
        ));

        let cli = Cli::parse_from(["v2t", "session", "copy"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Session {
                action: SessionAction::Copy
            })
        ));

        let cli = Cli::parse_from(["v2t", "session", "clear"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Session {
                action: SessionAction::Clear
            })
        ));
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("api_key"));
        assert!(is_valid_config_key("sample_rate"));
        assert!(is_valid_config_key("log_level"));
        assert!(!is_valid_config_key("invalid_key"));
    }

    #[test]
    fn verify_cli() {
        // Verify the CLI definition is valid
        Cli::command().debug_assert();
    }
}
