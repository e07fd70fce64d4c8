//! Registry configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::policy::AccessPolicy;

/// Largest accepted `event_channel_capacity`.
pub const MAX_EVENT_CHANNEL_CAPACITY: usize = 1 << 20;

/// A configuration value outside its accepted range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("event_channel_capacity must be in 1..={max}, got {value}")]
    EventChannelCapacity { value: usize, max: usize },

    #[error("max_event_page must be at least 1")]
    ZeroEventPage,
}

/// Configuration for the Registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Buffered audit events per live subscriber before it starts lagging.
    pub event_channel_capacity: usize,
    /// Upper bound on events returned by one `events_since` call.
    pub max_event_page: usize,
    /// Who may submit proofs.
    pub access: AccessPolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: 1024,
            max_event_page: 1000,
            access: AccessPolicy::Open,
        }
    }
}

impl RegistryConfig {
    /// Check value ranges. Call after loading from an untrusted source.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_EVENT_CHANNEL_CAPACITY).contains(&self.event_channel_capacity) {
            return Err(ConfigError::EventChannelCapacity {
                value: self.event_channel_capacity,
                max: MAX_EVENT_CHANNEL_CAPACITY,
            });
        }
        if self.max_event_page == 0 {
            return Err(ConfigError::ZeroEventPage);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: RegistryConfig = toml::from_str("max_event_page = 10\n").unwrap();
        assert_eq!(config.max_event_page, 10);
        assert_eq!(config.event_channel_capacity, 1024);
        assert_eq!(config.access, AccessPolicy::Open);
    }

    #[test]
    fn test_default_is_valid() {
        assert_eq!(RegistryConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_oversized_channel_capacity() {
        let config: RegistryConfig =
            toml::from_str("event_channel_capacity = 9223372036854775807\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EventChannelCapacity { .. })
        ));

        let at_cap = RegistryConfig {
            event_channel_capacity: MAX_EVENT_CHANNEL_CAPACITY,
            ..RegistryConfig::default()
        };
        assert_eq!(at_cap.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_zero_channel_capacity() {
        let config: RegistryConfig = toml::from_str("event_channel_capacity = 0\n").unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::EventChannelCapacity {
                value: 0,
                max: MAX_EVENT_CHANNEL_CAPACITY
            })
        );
    }

    #[test]
    fn test_rejects_zero_event_page() {
        let config: RegistryConfig = toml::from_str("max_event_page = 0\n").unwrap();
        assert_eq!(config.validate(), Err(ConfigError::ZeroEventPage));
    }
}
