//! Link counters
//!
//! Written from the receive context and the consumer, read by the heartbeat.
//! Uses `portable-atomic` because the ESP32-C3 has no native atomic
//! read-modify-write.

use portable_atomic::{AtomicU32, Ordering};

/// Running counters for the receive pipeline
#[derive(Debug, Default)]
pub struct LinkStats {
    received: AtomicU32,
    broadcast: AtomicU32,
    unicast: AtomicU32,
    rejected: AtomicU32,
    dropped_no_memory: AtomicU32,
    dropped_queue_full: AtomicU32,
    applied: AtomicU32,
}

/// Point-in-time copy of [`LinkStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatsSnapshot {
    /// Frames handed to ingestion, valid or not
    pub received: u32,
    /// Valid frames sent to the broadcast address
    pub broadcast: u32,
    /// Valid frames sent to this node directly
    pub unicast: u32,
    /// Frames rejected as malformed
    pub rejected: u32,
    /// Frames dropped because the payload could not be allocated
    pub dropped_no_memory: u32,
    /// Frames dropped because the queue stayed full
    pub dropped_queue_full: u32,
    /// Events the consumer applied to the outputs
    pub applied: u32,
}

impl StatsSnapshot {
    /// Frames that were accepted but never reached the consumer
    ///
    /// Saturates instead of wrapping once the counters get large.
    pub fn dropped(&self) -> u32 {
        self.dropped_no_memory.saturating_add(self.dropped_queue_full)
    }
}

impl LinkStats {
    pub const fn new() -> Self {
        Self {
            received: AtomicU32::new(0),
            broadcast: AtomicU32::new(0),
            unicast: AtomicU32::new(0),
            rejected: AtomicU32::new(0),
            dropped_no_memory: AtomicU32::new(0),
            dropped_queue_full: AtomicU32::new(0),
            applied: AtomicU32::new(0),
        }
    }

    pub(crate) fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_broadcast(&self) {
        self.broadcast.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unicast(&self) {
        self.unicast.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_no_memory(&self) {
        self.dropped_no_memory.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_queue_full(&self) {
        self.dropped_queue_full.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_applied(&self) {
        self.applied.fetch_add(1, Ordering::Relaxed);
    }

    /// Read all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            broadcast: self.broadcast.load(Ordering::Relaxed),
            unicast: self.unicast.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            dropped_no_memory: self.dropped_no_memory.load(Ordering::Relaxed),
            dropped_queue_full: self.dropped_queue_full.load(Ordering::Relaxed),
            applied: self.applied.load(Ordering::Relaxed),
        }
    }
}
