//! Link configuration
//!
//! Settings come from link.toml, validated by build.rs and compiled in.
//! They are checked again here; an invalid set falls back to defaults.

use defmt::*;
use nowdrive_core::{IngestConfig, LinkConfig};

mod generated {
    include!(concat!(env!("OUT_DIR"), "/link_config.rs"));
}

/// Radio link settings
pub fn link_config() -> LinkConfig {
    match LinkConfig::with_pmk(generated::CHANNEL, generated::PMK, generated::LONG_RANGE) {
        Ok(config) => {
            info!(
                "Link config: channel={}, long_range={}",
                config.channel, config.long_range
            );
            config
        }
        Err(e) => {
            error!("Invalid link config: {}, using defaults", e);
            LinkConfig::default()
        }
    }
}

/// Receive ingestion settings
pub fn ingest_config() -> IngestConfig {
    let config = IngestConfig {
        enqueue_timeout_ms: generated::ENQUEUE_TIMEOUT_MS,
        ..Default::default()
    };
    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            error!("Invalid ingest config: {}, using defaults", e);
            IngestConfig::default()
        }
    }
}
