//! Radio receive task
//!
//! Pulls frames from the ESP-NOW driver and hands them to the ingestor,
//! which copies them onto the receive queue.

use defmt::*;
use esp_wifi::esp_now::EspNowReceiver;
use nowdrive_core::MacAddress;

use crate::channels::ReceiveIngestor;

#[embassy_executor::task]
pub async fn receive_task(mut receiver: EspNowReceiver<'static>, ingestor: ReceiveIngestor) {
    info!("Receive task started");

    loop {
        let frame = receiver.receive_async().await;
        let source = MacAddress::new(frame.info.src_address);
        let destination = MacAddress::new(frame.info.dst_address);

        // Rejections and drops are logged and counted by the ingestor
        let _ = ingestor.ingest(&source, &destination, frame.data()).await;
    }
}
