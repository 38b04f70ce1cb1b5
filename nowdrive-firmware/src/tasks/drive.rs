//! Drive task
//!
//! Owns the four output lines and applies each dequeued joystick sample.

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use esp_hal::gpio::Output;
use nowdrive_core::Consumer;
use nowdrive_drivers::PinBank;

use crate::channels::RECEIVE_QUEUE_SIZE;

/// Up/down/right/left lines on board GPIOs
pub type DriveOutputs = PinBank<Output<'static>>;

/// Consumer side of the receive queue
pub type DriveConsumer = Consumer<'static, CriticalSectionRawMutex, DriveOutputs, RECEIVE_QUEUE_SIZE>;

#[embassy_executor::task]
pub async fn drive_task(mut consumer: DriveConsumer) {
    info!("Drive task started");
    consumer.run().await;
}
