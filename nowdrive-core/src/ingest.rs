//! Receive ingestion
//!
//! Runs in the radio's receive context. Each frame is checked, copied into
//! an owned buffer and pushed onto the bounded queue. The only suspension
//! point is the enqueue, and it is capped by [`IngestConfig::enqueue_timeout`].
//! When the queue stays full the frame is dropped along with its buffer;
//! stale control data is worth less than a stalled radio.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Sender;
use embassy_time::with_timeout;

use crate::config::IngestConfig;
use crate::event::ReceiveEvent;
use crate::link::{Delivery, MacAddress};
use crate::stats::LinkStats;

/// Why a frame did not make it onto the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IngestError {
    /// No sender address supplied
    MissingSource,
    /// No payload supplied
    MissingPayload,
    /// Length is non-positive, larger than the data, or above the payload limit
    InvalidLength(i32),
    /// Payload buffer could not be allocated
    OutOfMemory,
    /// Queue stayed full for the whole enqueue timeout
    QueueFull,
}

/// Producer side of the receive pipeline
pub struct Ingestor<'a, M: RawMutex, const N: usize> {
    queue: Sender<'a, M, ReceiveEvent, N>,
    stats: &'a LinkStats,
    config: IngestConfig,
}

impl<'a, M: RawMutex, const N: usize> Ingestor<'a, M, N> {
    /// Create an ingestor feeding `queue`
    pub fn new(
        queue: Sender<'a, M, ReceiveEvent, N>,
        stats: &'a LinkStats,
        config: IngestConfig,
    ) -> Self {
        Self {
            queue,
            stats,
            config,
        }
    }

    /// Ingestion settings
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Hand one received frame to the consumer
    ///
    /// Mirrors the radio stack's receive callback: any argument may be
    /// missing and `len` comes straight from the driver. Only the first
    /// `len` bytes of `data` are copied. Every failure is logged here, so
    /// callers in the receive context can ignore the result.
    pub async fn on_packet_received(
        &self,
        source: Option<&MacAddress>,
        destination: &MacAddress,
        data: Option<&[u8]>,
        len: i32,
    ) -> Result<Delivery, IngestError> {
        self.stats.record_received();

        let (source, data) = match self.check(source, data, len) {
            Ok(frame) => frame,
            Err(e) => {
                log_error!("Receive callback argument error: {:?}", e);
                self.stats.record_rejected();
                return Err(e);
            }
        };

        let delivery = Delivery::classify(destination);
        match delivery {
            Delivery::Broadcast => {
                log_debug!("Receive broadcast data from {:?}", source);
                self.stats.record_broadcast();
            }
            Delivery::Unicast => {
                log_debug!("Receive unicast data from {:?}", source);
                self.stats.record_unicast();
            }
        }

        let event = match ReceiveEvent::packet(*source, data) {
            Ok(event) => event,
            Err(_) => {
                log_error!("Failed to allocate {} byte receive buffer", data.len());
                self.stats.record_no_memory();
                return Err(IngestError::OutOfMemory);
            }
        };

        // On timeout the pending send is dropped, and the payload with it
        match with_timeout(self.config.enqueue_timeout(), self.queue.send(event)).await {
            Ok(()) => Ok(delivery),
            Err(_) => {
                log_warn!("Receive queue full, dropping frame from {:?}", source);
                self.stats.record_queue_full();
                Err(IngestError::QueueFull)
            }
        }
    }

    /// Ingest a frame the driver delivered as plain slices
    pub async fn ingest(
        &self,
        source: &MacAddress,
        destination: &MacAddress,
        data: &[u8],
    ) -> Result<Delivery, IngestError> {
        let len = i32::try_from(data.len()).unwrap_or(i32::MAX);
        self.on_packet_received(Some(source), destination, Some(data), len)
            .await
    }

    fn check<'d>(
        &self,
        source: Option<&'d MacAddress>,
        data: Option<&'d [u8]>,
        len: i32,
    ) -> Result<(&'d MacAddress, &'d [u8]), IngestError> {
        let source = source.ok_or(IngestError::MissingSource)?;
        let data = data.ok_or(IngestError::MissingPayload)?;
        let len_bytes = usize::try_from(len)
            .ok()
            .filter(|&n| n > 0 && n <= data.len() && n <= self.config.max_payload)
            .ok_or(IngestError::InvalidLength(len))?;
        Ok((source, &data[..len_bytes]))
    }
}
