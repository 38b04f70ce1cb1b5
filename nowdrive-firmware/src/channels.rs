//! Inter-task communication channels
//!
//! The receive queue is the only channel: the radio task produces into it
//! and the drive task consumes from it. It is created once in `main` and
//! handed to both tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use nowdrive_core::{EventQueue, Ingestor};

/// Receive queue capacity
pub const RECEIVE_QUEUE_SIZE: usize = 6;

/// Queue between the radio and drive tasks
pub type ReceiveQueue = EventQueue<CriticalSectionRawMutex, RECEIVE_QUEUE_SIZE>;

/// Producer handle used by the radio task
pub type ReceiveIngestor = Ingestor<'static, CriticalSectionRawMutex, RECEIVE_QUEUE_SIZE>;
