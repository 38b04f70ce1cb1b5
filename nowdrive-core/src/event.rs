//! Events passed from the receive path to the consumer
//!
//! Every event owns its data. Moving an event into the queue moves the
//! payload with it, so the consumer is the only holder once it dequeues, and
//! the buffer is freed exactly once when the event is dropped.

use alloc::boxed::Box;
use alloc::collections::TryReserveError;
use alloc::vec::Vec;

use crate::link::MacAddress;

/// Heap buffer holding one received frame's data
///
/// Not `Clone`: each buffer has exactly one owner.
#[derive(Debug, PartialEq, Eq)]
pub struct Payload(Box<[u8]>);

impl Payload {
    /// Copy `data` into a freshly allocated buffer of exactly `data.len()` bytes
    ///
    /// Fails instead of aborting when the allocator cannot satisfy the
    /// request.
    pub fn copy_from(data: &[u8]) -> Result<Self, TryReserveError> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(data.len())?;
        buf.extend_from_slice(data);
        Ok(Self(buf.into_boxed_slice()))
    }

    /// Payload bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the payload has no bytes
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Payload {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Payload({=usize}B)", self.len());
    }
}

/// Outcome of a transmit, reported by the radio driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendStatus {
    Success,
    Failure,
}

/// Event delivered through the receive queue
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReceiveEvent {
    /// A frame arrived from `source`
    PacketReceived {
        source: MacAddress,
        payload: Payload,
    },
    /// A transmit to `peer` finished
    ///
    /// Reserved for a transmit path; this node never sends, so nothing
    /// produces it yet.
    SendCompleted { peer: MacAddress, status: SendStatus },
}

impl ReceiveEvent {
    /// Build a receive event, copying `data` into an owned payload
    pub fn packet(source: MacAddress, data: &[u8]) -> Result<Self, TryReserveError> {
        Ok(ReceiveEvent::PacketReceived {
            source,
            payload: Payload::copy_from(data)?,
        })
    }

    /// Address of the peer this event concerns
    pub fn peer(&self) -> MacAddress {
        match self {
            ReceiveEvent::PacketReceived { source, .. } => *source,
            ReceiveEvent::SendCompleted { peer, .. } => *peer,
        }
    }
}
