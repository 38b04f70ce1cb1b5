//! Link-layer addressing
//!
//! ESP-NOW identifies peers by their 6-byte station MAC address. A frame sent
//! to `FF:FF:FF:FF:FF:FF` is a broadcast; anything else is directed at one
//! peer.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Length of a hardware address in bytes
pub const MAC_LEN: usize = 6;

/// Largest payload a single ESP-NOW frame can carry
pub const MAX_PAYLOAD_LEN: usize = 250;

/// The link-wide broadcast address
pub const BROADCAST_ADDRESS: MacAddress = MacAddress([0xFF; MAC_LEN]);

/// 6-byte hardware address of a peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MacAddress(pub [u8; MAC_LEN]);

impl MacAddress {
    /// Create an address from its raw bytes
    pub const fn new(bytes: [u8; MAC_LEN]) -> Self {
        Self(bytes)
    }

    /// Copy an address out of a byte slice
    ///
    /// Returns `None` unless the slice is exactly [`MAC_LEN`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; MAC_LEN] = bytes.try_into().ok()?;
        Some(Self(bytes))
    }

    /// Raw address bytes
    pub const fn octets(&self) -> &[u8; MAC_LEN] {
        &self.0
    }

    /// Check if this is the broadcast address
    pub fn is_broadcast(&self) -> bool {
        *self == BROADCAST_ADDRESS
    }
}

impl From<[u8; MAC_LEN]> for MacAddress {
    fn from(bytes: [u8; MAC_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

/// How a frame was addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Delivery {
    /// Sent to the broadcast address
    Broadcast,
    /// Sent to this node's own address
    Unicast,
}

impl Delivery {
    /// Classify a frame by its destination address
    pub fn classify(destination: &MacAddress) -> Self {
        if destination.is_broadcast() {
            Delivery::Broadcast
        } else {
            Delivery::Unicast
        }
    }
}
