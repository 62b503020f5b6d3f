//! V2T CLI entry point

use std::process::ExitCode;

use clap::Parser;

use v2t::cli::{
    app::{load_merged_config, run_oneshot, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    daemon_app::run_daemon,
    daemon_cmd::handle_session_command,
    presenter::Presenter,
    DaemonOptions, OneshotOptions,
};
use v2t::domain::audio::Duration;
use v2t::domain::config::AppConfig;
use v2t::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Handle subcommands that don't need the merged config
    match cli.command {
        Some(Commands::Config { action }) => {
            init_logging(None);
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        Some(Commands::Session { action }) => {
            init_logging(None);
            if let Err(e) = handle_session_command(action, &presenter).await {
                presenter.error(&e);
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        None => {}
    }

    // Build CLI config overlay from args
    let cli_config = AppConfig {
        api_key: None, // API key comes from env/file only
        max_duration: cli.max_duration.clone(),
        clipboard: if cli.clipboard { Some(true) } else { None },
        notify: if cli.notify { Some(true) } else { None },
        audio_cue: if cli.audio_cue { Some(true) } else { None },
        ..Default::default()
    };

    // Merge config: defaults < file < env < cli
    let config = load_merged_config(cli_config).await;

    init_logging(Some(config.log_level_or_default()));

    // Route to the appropriate runner
    if cli.daemon {
        let max_duration = match config.max_duration.as_ref() {
            Some(s) => match s.parse::<Duration>() {
                Ok(d) => d,
                Err(e) => {
                    presenter.error(&format!("Invalid max-duration: {}", e));
                    return ExitCode::from(EXIT_USAGE_ERROR);
                }
            },
            None => Duration::default_max_duration(),
        };

        let options = DaemonOptions {
            max_duration,
            clipboard: config.clipboard_or_default(),
            notify: config.notify_or_default(),
            audio_cue: config.audio_cue_or_default(),
        };

        run_daemon(options, &config).await
    } else {
        let duration = match cli.duration.as_ref() {
            Some(s) => match s.parse::<Duration>() {
                Ok(d) => d,
                Err(e) => {
                    presenter.error(&format!("Invalid duration: {}", e));
                    return ExitCode::from(EXIT_USAGE_ERROR);
                }
            },
            None => Duration::default_duration(),
        };

        let options = OneshotOptions {
            duration,
            clipboard: config.clipboard_or_default(),
            notify: config.notify_or_default(),
            audio_cue: config.audio_cue_or_default(),
        };

        run_oneshot(options, &config).await
    }
}

/// Initialize the logger. `V2T_LOG` overrides the configured level.
fn init_logging(config_level: Option<&str>) {
    let default_level = config_level.unwrap_or("warn");
    let env = env_logger::Env::new().filter_or("V2T_LOG", default_level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_secs()
        .try_init();
}
