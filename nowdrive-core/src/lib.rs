//! Board-agnostic core logic for the nowdrive receiver
//!
//! This crate contains everything between the radio driver and the output
//! pins that does not depend on a specific chip:
//!
//! - Link addressing (MAC addresses, broadcast classification)
//! - Receive events with owned payload buffers
//! - Receive ingestion (validate, copy, bounded enqueue)
//! - Event consumer (decode axes, drive four output lines)
//! - Joystick decision table
//! - Link counters and configuration types
//!
//! # Pipeline
//!
//! ```text
//! radio driver ──► Ingestor ──► Channel<ReceiveEvent, N> ──► Consumer ──► OutputBank
//!   (high prio)    copy+enqueue       bounded FIFO           decode+drive   4 lines
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod log;

pub mod config;
pub mod consumer;
pub mod drive;
pub mod event;
pub mod ingest;
pub mod link;
pub mod stats;
pub mod traits;

pub use config::{ConfigError, IngestConfig, LinkConfig};
pub use consumer::Consumer;
pub use drive::{AxisSample, DriveState, Horizontal, Line, Vertical};
pub use event::{Payload, ReceiveEvent, SendStatus};
pub use ingest::{IngestError, Ingestor};
pub use link::{Delivery, MacAddress, BROADCAST_ADDRESS, MAX_PAYLOAD_LEN};
pub use stats::{LinkStats, StatsSnapshot};
pub use traits::{Level, OutputBank};

/// Bounded receive queue shared by the ingestion and consumer sides
pub type EventQueue<M, const N: usize> = embassy_sync::channel::Channel<M, ReceiveEvent, N>;
