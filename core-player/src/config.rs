//! # Player Configuration
//!
//! Configuration for the playback controller.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Interval between position reports while playing.
    ///
    /// Default: 1 second.
    #[serde(default = "default_report_interval")]
    pub report_interval: Duration,

    /// Buffer capacity of the event bus.
    ///
    /// Default: 100 events.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            report_interval: default_report_interval(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl PlayerConfig {
    /// Configuration for UI-grade position updates (4 reports per second).
    pub fn fine_grained() -> Self {
        Self {
            report_interval: Duration::from_millis(250),
            ..Default::default()
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.report_interval.is_zero() {
            return Err("report_interval must be > 0".to_string());
        }

        if self.event_capacity == 0 {
            return Err("event_capacity must be > 0".to_string());
        }

        Ok(())
    }
}

fn default_report_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_event_capacity() -> usize {
    crate::events::DEFAULT_EVENT_BUFFER_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PlayerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.report_interval, Duration::from_secs(1));
        assert_eq!(config.event_capacity, 100);
    }

    #[test]
    fn fine_grained_config_reports_faster() {
        let config = PlayerConfig::fine_grained();
        assert!(config.validate().is_ok());
        assert!(config.report_interval < PlayerConfig::default().report_interval);
    }

    #[test]
    fn validation_rejects_degenerate_values() {
        let mut config = PlayerConfig::default();

        config.report_interval = Duration::ZERO;
        assert!(config.validate().is_err());
        config.report_interval = Duration::from_secs(1);

        config.event_capacity = 0;
        assert!(config.validate().is_err());
    }
}
