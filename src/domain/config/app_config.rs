//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::audio::Duration;

/// Default speech-to-text model
pub const DEFAULT_STT_MODEL: &str = "whisper-1";

/// Default cleanup model
pub const DEFAULT_CLEANUP_MODEL: &str = "gpt-3.5-turbo";

/// Default capture sample rate (speech-optimized)
pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;

/// Default capture channel count (mono)
pub const DEFAULT_CHANNELS: u16 = 1;

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub stt_model: Option<String>,
    pub cleanup_model: Option<String>,
    pub sample_rate: Option<u32>,
    pub channels: Option<u16>,
    pub max_duration: Option<String>,
    pub clipboard: Option<bool>,
    pub notify: Option<bool>,
    pub audio_cue: Option<bool>,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            api_key: None,
            stt_model: Some(DEFAULT_STT_MODEL.to_string()),
            cleanup_model: Some(DEFAULT_CLEANUP_MODEL.to_string()),
            sample_rate: Some(DEFAULT_SAMPLE_RATE),
            channels: Some(DEFAULT_CHANNELS),
            max_duration: Some("60s".to_string()),
            clipboard: Some(false),
            notify: Some(false),
            audio_cue: Some(false),
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            stt_model: other.stt_model.or(self.stt_model),
            cleanup_model: other.cleanup_model.or(self.cleanup_model),
            sample_rate: other.sample_rate.or(self.sample_rate),
            channels: other.channels.or(self.channels),
            max_duration: other.max_duration.or(self.max_duration),
            clipboard: other.clipboard.or(self.clipboard),
            notify: other.notify.or(self.notify),
            audio_cue: other.audio_cue.or(self.audio_cue),
            log_level: other.log_level.or(self.log_level),
        }
    }

    /// Get STT model, or the default if not set
    pub fn stt_model_or_default(&self) -> &str {
        self.stt_model.as_deref().unwrap_or(DEFAULT_STT_MODEL)
    }

    /// Get cleanup model, or the default if not set
    pub fn cleanup_model_or_default(&self) -> &str {
        self.cleanup_model
            .as_deref()
            .unwrap_or(DEFAULT_CLEANUP_MODEL)
    }

    /// Get sample rate, or the default if not set
    pub fn sample_rate_or_default(&self) -> u32 {
        self.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE)
    }

    /// Get channel count, or the default if not set
    pub fn channels_or_default(&self) -> u16 {
        self.channels.unwrap_or(DEFAULT_CHANNELS)
    }

    /// Get max_duration as parsed Duration, or default if not set/invalid
    pub fn max_duration_or_default(&self) -> Duration {
        self.max_duration
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_max_duration)
    }

    /// Get clipboard setting, or false if not set
    pub fn clipboard_or_default(&self) -> bool {
        self.clipboard.unwrap_or(false)
    }

    /// Get notify setting, or false if not set
    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(false)
    }

    /// Get audio cue setting, or false if not set
    pub fn audio_cue_or_default(&self) -> bool {
        self.audio_cue.unwrap_or(false)
    }

    /// Get log level, or "info" if not set
    pub fn log_level_or_default(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert!(config.api_key.is_none());
        assert_eq!(config.stt_model, Some("whisper-1".to_string()));
        assert_eq!(config.cleanup_model, Some("gpt-3.5-turbo".to_string()));
        assert_eq!(config.sample_rate, Some(16_000));
        assert_eq!(config.channels, Some(1));
        assert_eq!(config.max_duration, Some("60s".to_string()));
        assert_eq!(config.clipboard, Some(false));
        assert_eq!(config.notify, Some(false));
        assert_eq!(config.audio_cue, Some(false));
        assert_eq!(config.log_level, Some("info".to_string()));
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.api_key.is_none());
        assert!(config.stt_model.is_none());
        assert!(config.sample_rate.is_none());
        assert!(config.clipboard.is_none());
        assert!(config.log_level.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            api_key: Some("base_key".to_string()),
            stt_model: Some("whisper-1".to_string()),
            sample_rate: Some(16_000),
            ..Default::default()
        };

        let other = AppConfig {
            api_key: Some("other_key".to_string()),
            stt_model: None, // Should not override
            sample_rate: Some(44_100),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.api_key, Some("other_key".to_string()));
        assert_eq!(merged.stt_model, Some("whisper-1".to_string())); // Kept from base
        assert_eq!(merged.sample_rate, Some(44_100));
    }

    #[test]
    fn merge_preserves_base_when_other_is_none() {
        let base = AppConfig {
            api_key: Some("key".to_string()),
            clipboard: Some(true),
            ..Default::default()
        };

        let merged = base.merge(AppConfig::empty());

        assert_eq!(merged.api_key, Some("key".to_string()));
        assert_eq!(merged.clipboard, Some(true));
    }

    #[test]
    fn accessors_fall_back_to_defaults() {
        let config = AppConfig::empty();
        assert_eq!(config.stt_model_or_default(), "whisper-1");
        assert_eq!(config.cleanup_model_or_default(), "gpt-3.5-turbo");
        assert_eq!(config.sample_rate_or_default(), 16_000);
        assert_eq!(config.channels_or_default(), 1);
        assert_eq!(config.max_duration_or_default().as_secs(), 60);
        assert!(!config.clipboard_or_default());
        assert!(!config.notify_or_default());
        assert!(!config.audio_cue_or_default());
        assert_eq!(config.log_level_or_default(), "info");
    }

    #[test]
    fn max_duration_parses_configured_value() {
        let config = AppConfig {
            max_duration: Some("2m".to_string()),
            ..Default::default()
        };
        assert_eq!(config.max_duration_or_default().as_secs(), 120);
    }

    #[test]
    fn max_duration_falls_back_on_invalid() {
        let config = AppConfig {
            max_duration: Some("invalid".to_string()),
            ..Default::default()
        };
        assert_eq!(config.max_duration_or_default().as_secs(), 60);
    }

    #[test]
    fn toml_round_trip() {
        let config = AppConfig {
            api_key: Some("key".to_string()),
            sample_rate: Some(48_000),
            channels: Some(2),
            notify: Some(true),
            ..Default::default()
        };

        let serialized = toml::to_string(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(parsed.api_key, config.api_key);
        assert_eq!(parsed.sample_rate, config.sample_rate);
        assert_eq!(parsed.channels, config.channels);
        assert_eq!(parsed.notify, config.notify);
    }
}
