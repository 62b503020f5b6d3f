//! Config subcommand handlers

use crate::application::ports::ConfigStore;
use crate::domain::audio::Duration;
use crate::domain::error::ConfigError;

use super::args::{ConfigAction, VALID_CONFIG_KEYS, VALID_LOG_LEVELS};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command(
    action: ConfigAction,
    store: &dyn ConfigStore,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => {
            presenter.output(&store.path().to_string_lossy());
            Ok(())
        }
    }
}

/// Create the config file with defaults
async fn handle_init(store: &dyn ConfigStore, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Created config file at: {}",
        store.path().display()
    ));
    Ok(())
}

/// Set a config value
async fn handle_set(
    store: &dyn ConfigStore,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    if !super::args::is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    validate_value(key, value)?;

    let mut config = store.load().await?;

    match key {
        "api_key" => config.api_key = Some(value.to_string()),
        "stt_model" => config.stt_model = Some(value.to_string()),
        "cleanup_model" => config.cleanup_model = Some(value.to_string()),
        "sample_rate" => config.sample_rate = value.parse().ok(),
        "channels" => config.channels = value.parse().ok(),
        "max_duration" => config.max_duration = Some(value.to_string()),
        "clipboard" => config.clipboard = parse_bool(value).ok(),
        "notify" => config.notify = parse_bool(value).ok(),
        "audio_cue" => config.audio_cue = parse_bool(value).ok(),
        "log_level" => config.log_level = Some(value.to_lowercase()),
        _ => unreachable!("key validated above"),
    }

    store.save(&config).await?;
    presenter.success(&format!("Set {} = {}", key, display_value(key, value)));
    Ok(())
}

/// Get a config value
async fn handle_get(
    store: &dyn ConfigStore,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    if !super::args::is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    let config = store.load().await?;

    let value = match key {
        "api_key" => config.api_key.map(|s| mask_api_key(&s)),
        "stt_model" => config.stt_model,
        "cleanup_model" => config.cleanup_model,
        "sample_rate" => config.sample_rate.map(|v| v.to_string()),
        "channels" => config.channels.map(|v| v.to_string()),
        "max_duration" => config.max_duration,
        "clipboard" => config.clipboard.map(|b| b.to_string()),
        "notify" => config.notify.map(|b| b.to_string()),
        "audio_cue" => config.audio_cue.map(|b| b.to_string()),
        "log_level" => config.log_level,
        _ => unreachable!("key validated above"),
    };

    presenter.output(&value.unwrap_or_else(|| "(not set)".to_string()));
    Ok(())
}

/// List all config values
async fn handle_list(store: &dyn ConfigStore, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    presenter.key_value(
        "api_key",
        &config
            .api_key
            .map(|s| mask_api_key(&s))
            .unwrap_or_else(|| "(not set)".to_string()),
    );
    presenter.key_value(
        "stt_model",
        config.stt_model.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "cleanup_model",
        config.cleanup_model.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "sample_rate",
        &config
            .sample_rate
            .map(|v| v.to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
    );
    presenter.key_value(
        "channels",
        &config
            .channels
            .map(|v| v.to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
    );
    presenter.key_value(
        "max_duration",
        config.max_duration.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "clipboard",
        &config
            .clipboard
            .map(|b| b.to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
    );
    presenter.key_value(
        "notify",
        &config
            .notify
            .map(|b| b.to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
    );
    presenter.key_value(
        "audio_cue",
        &config
            .audio_cue
            .map(|b| b.to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
    );
    presenter.key_value(
        "log_level",
        config.log_level.as_deref().unwrap_or("(not set)"),
    );

    Ok(())
}

/// Validate a value for a key
fn validate_value(key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message,
        })
    };

    match key {
        "sample_rate" => match value.parse::<u32>() {
            Ok(rate) if rate > 0 => Ok(()),
            _ => invalid("Value must be a positive sample rate in Hz (e.g. 16000)".to_string()),
        },
        "channels" => match value.parse::<u16>() {
            Ok(1) | Ok(2) => Ok(()),
            _ => invalid("Value must be 1 (mono) or 2 (stereo)".to_string()),
        },
        "max_duration" => match value.parse::<Duration>() {
            Ok(_) => Ok(()),
            Err(e) => invalid(e.to_string()),
        },
        "clipboard" | "notify" | "audio_cue" => match parse_bool(value) {
            Ok(_) => Ok(()),
            Err(_) => invalid("Value must be 'true' or 'false'".to_string()),
        },
        "log_level" => {
            if VALID_LOG_LEVELS.contains(&value.to_lowercase().as_str()) {
                Ok(())
            } else {
                invalid(format!(
                    "Value must be one of: {}",
                    VALID_LOG_LEVELS.join(", ")
                ))
            }
        }
        _ => {
            // api_key and model names accept any non-empty string
            if value.trim().is_empty() {
                invalid("Value must not be empty".to_string())
            } else {
                Ok(())
            }
        }
    }
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}

/// Mask an API key for display
fn mask_api_key(key: &str) -> String {
    if key.len() <= 8 {
        "********".to_string()
    } else {
        format!("{}****{}", &key[..4], &key[key.len() - 4..])
    }
}

/// Value as shown in the set confirmation (keys are masked)
fn display_value(key: &str, value: &str) -> String {
    if key == "api_key" {
        mask_api_key(value)
    } else {
        value.to_string()
    }
}
