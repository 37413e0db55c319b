//! # Player Configuration
//!
//! Timing knobs for the playback core: per-state idle timeouts and the
//! auto-play buffering controller.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{PlaybackError, Result};

/// Inactivity limits per player state.
///
/// A zero duration disables the idle timer for that state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdleTimeouts {
    /// Default: 5 minutes.
    #[serde(default = "default_five_minutes")]
    pub launching: Duration,

    /// Default: 5 minutes.
    #[serde(default = "default_five_minutes")]
    pub loading: Duration,

    /// Default: 20 minutes.
    #[serde(default = "default_paused_timeout")]
    pub paused: Duration,

    /// Default: 30 seconds.
    #[serde(default = "default_stalled_timeout")]
    pub stalled: Duration,

    /// Default: 5 minutes.
    #[serde(default = "default_five_minutes")]
    pub done: Duration,

    /// Default: 5 minutes.
    #[serde(default = "default_five_minutes")]
    pub idle: Duration,
}

impl Default for IdleTimeouts {
    fn default() -> Self {
        Self {
            launching: default_five_minutes(),
            loading: default_five_minutes(),
            paused: default_paused_timeout(),
            stalled: default_stalled_timeout(),
            done: default_five_minutes(),
            idle: default_five_minutes(),
        }
    }
}

/// Auto-play buffering ("pump-priming") parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoplayConfig {
    /// Contiguous buffered lead required before playback starts.
    ///
    /// Default: 5 seconds.
    #[serde(default = "default_buffer_target")]
    pub buffer_target: Duration,

    /// Delay between buffered-lead polls.
    ///
    /// Default: 200 ms.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: Duration,

    /// Minimum time the loading screen stays up before the first probe.
    ///
    /// Default: 2000 ms.
    #[serde(default = "default_min_display")]
    pub min_display: Duration,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            buffer_target: default_buffer_target(),
            poll_interval: default_poll_interval(),
            min_display: default_min_display(),
        }
    }
}

/// Playback core configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub idle: IdleTimeouts,

    #[serde(default)]
    pub autoplay: AutoplayConfig,

    /// Log every media-sink signal at `debug` together with the current state.
    ///
    /// Default: false.
    #[serde(default)]
    pub trace_media_signals: bool,
}

impl PlayerConfig {
    /// Configuration with short timings, for demos and tests that run on a
    /// real clock.
    pub fn fast() -> Self {
        Self {
            autoplay: AutoplayConfig {
                buffer_target: Duration::from_secs(1),
                poll_interval: Duration::from_millis(20),
                min_display: Duration::from_millis(50),
            },
            ..Default::default()
        }
    }

    pub fn with_trace_media_signals(mut self, enabled: bool) -> Self {
        self.trace_media_signals = enabled;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.autoplay.poll_interval.is_zero() {
            return Err(PlaybackError::InvalidConfig(
                "autoplay.poll_interval must be > 0".to_string(),
            ));
        }

        if self.autoplay.buffer_target.is_zero() {
            return Err(PlaybackError::InvalidConfig(
                "autoplay.buffer_target must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn default_five_minutes() -> Duration {
    Duration::from_secs(5 * 60)
}

fn default_paused_timeout() -> Duration {
    Duration::from_secs(20 * 60)
}

fn default_stalled_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_buffer_target() -> Duration {
    Duration::from_secs(5)
}

fn default_poll_interval() -> Duration {
    Duration::from_millis(200)
}

fn default_min_display() -> Duration {
    Duration::from_millis(2000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlayerConfig::default();
        assert_eq!(config.idle.paused, Duration::from_secs(1200));
        assert_eq!(config.idle.stalled, Duration::from_secs(30));
        assert_eq!(config.autoplay.buffer_target, Duration::from_secs(5));
        assert_eq!(config.autoplay.poll_interval, Duration::from_millis(200));
        assert_eq!(config.autoplay.min_display, Duration::from_millis(2000));
        assert!(!config.trace_media_signals);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fast_config_is_valid() {
        assert!(PlayerConfig::fast().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_timings() {
        let mut config = PlayerConfig::default();
        config.autoplay.poll_interval = Duration::ZERO;
        assert!(matches!(
            config.validate(),
            Err(PlaybackError::InvalidConfig(_))
        ));

        let mut config = PlayerConfig::default();
        config.autoplay.buffer_target = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: PlayerConfig =
            serde_json::from_str(r#"{ "trace_media_signals": true }"#).unwrap();
        assert!(config.trace_media_signals);
        assert_eq!(config.idle, IdleTimeouts::default());

        let config: PlayerConfig = serde_json::from_str(
            r#"{ "idle": { "stalled": { "secs": 10, "nanos": 0 } } }"#,
        )
        .unwrap();
        assert_eq!(config.idle.stalled, Duration::from_secs(10));
        assert_eq!(config.idle.paused, Duration::from_secs(1200));
    }
}
