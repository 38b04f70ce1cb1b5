//! Configuration type definitions
//!
//! Values come from the firmware's `link.toml`, checked at build time and
//! re-checked here when the node starts.

use embassy_time::Duration;

use crate::link::MAX_PAYLOAD_LEN;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Length of the ESP-NOW primary master key
pub const PMK_LEN: usize = 16;

/// Default bound on how long ingestion waits for queue space
pub const DEFAULT_ENQUEUE_TIMEOUT_MS: u32 = 512;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Wi-Fi channel outside 1-14
    InvalidChannel(u8),
    /// Primary master key is not 16 bytes
    InvalidPmkLength(usize),
    /// Enqueue timeout must be non-zero
    ZeroEnqueueTimeout,
    /// Payload limit must be 1..=250
    InvalidPayloadLimit(usize),
}

/// Receive ingestion settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IngestConfig {
    /// Longest wait for queue space before a frame is dropped (ms)
    pub enqueue_timeout_ms: u32,
    /// Largest accepted payload (bytes)
    pub max_payload: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            enqueue_timeout_ms: DEFAULT_ENQUEUE_TIMEOUT_MS,
            max_payload: MAX_PAYLOAD_LEN,
        }
    }
}

impl IngestConfig {
    /// Enqueue timeout as an embassy duration
    pub fn enqueue_timeout(&self) -> Duration {
        Duration::from_millis(self.enqueue_timeout_ms as u64)
    }

    /// Check that the settings are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enqueue_timeout_ms == 0 {
            return Err(ConfigError::ZeroEnqueueTimeout);
        }
        if self.max_payload == 0 || self.max_payload > MAX_PAYLOAD_LEN {
            return Err(ConfigError::InvalidPayloadLimit(self.max_payload));
        }
        Ok(())
    }
}

/// Radio link settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    /// Wi-Fi channel shared with the transmitter (1-14)
    pub channel: u8,
    /// ESP-NOW primary master key
    pub pmk: [u8; PMK_LEN],
    /// Enable the 802.11 long-range PHY
    pub long_range: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            channel: 1,
            pmk: *b"pmk1234567890123",
            long_range: false,
        }
    }
}

impl LinkConfig {
    /// Build a config from a textual primary master key
    pub fn with_pmk(channel: u8, pmk: &str, long_range: bool) -> Result<Self, ConfigError> {
        let pmk: [u8; PMK_LEN] = pmk
            .as_bytes()
            .try_into()
            .map_err(|_| ConfigError::InvalidPmkLength(pmk.len()))?;
        let config = Self {
            channel,
            pmk,
            long_range,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the settings are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=14).contains(&self.channel) {
            return Err(ConfigError::InvalidChannel(self.channel));
        }
        Ok(())
    }
}
