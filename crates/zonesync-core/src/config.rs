//! Configuration types for the synchronizer
//!
//! All identifiers are required and validated before the loop starts;
//! a missing or zero identifier is a fatal startup error, never a
//! runtime retry condition.

use serde::{Deserialize, Serialize};

/// Default polling interval between reconciliation cycles (seconds)
pub const DEFAULT_INTERVAL_SECS: u64 = 300;

/// Main synchronizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Managed cluster identifier
    pub cluster_id: u64,

    /// Node pool identifier within the cluster
    pub pool_id: u64,

    /// DNS zone identifier whose apex records are managed
    pub zone_id: u64,

    /// Seconds between ticks of the control loop
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Capacity of the engine's event channel
    ///
    /// When full, new engine events are dropped (with a warning log).
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl SyncConfig {
    /// Create a configuration with the default interval
    pub fn new(cluster_id: u64, pool_id: u64, zone_id: u64) -> Self {
        Self {
            cluster_id,
            pool_id,
            zone_id,
            interval_secs: default_interval_secs(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }

    /// Set the polling interval
    pub fn with_interval_secs(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.cluster_id == 0 {
            return Err(crate::Error::config("cluster_id must be non-zero"));
        }
        if self.pool_id == 0 {
            return Err(crate::Error::config("pool_id must be non-zero"));
        }
        if self.zone_id == 0 {
            return Err(crate::Error::config("zone_id must be non-zero"));
        }
        if self.interval_secs == 0 {
            return Err(crate::Error::config("interval_secs must be > 0"));
        }
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("event_channel_capacity must be > 0"));
        }
        Ok(())
    }
}

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

fn default_event_channel_capacity() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config_passes() {
        let config = SyncConfig::new(100, 200, 300);
        assert!(config.validate().is_ok());
        assert_eq!(config.interval_secs, DEFAULT_INTERVAL_SECS);
    }

    #[test]
    fn zero_identifiers_are_rejected() {
        assert!(SyncConfig::new(0, 200, 300).validate().is_err());
        assert!(SyncConfig::new(100, 0, 300).validate().is_err());
        assert!(SyncConfig::new(100, 200, 0).validate().is_err());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = SyncConfig::new(100, 200, 300).with_interval_secs(0);
        assert!(config.validate().is_err());
    }
}
