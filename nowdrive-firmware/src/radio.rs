//! Wi-Fi and ESP-NOW bring-up
//!
//! Starts Wi-Fi in station mode, since ESP-NOW needs the radio running but
//! no association, then joins the configured channel and installs the
//! primary master key.

use defmt::*;
use esp_hal::peripherals::WIFI;
use esp_wifi::esp_now::{EspNowError, EspNowReceiver};
use esp_wifi::wifi::{self, Protocol, WifiController, WifiError, WifiMode};
use esp_wifi::EspWifiController;
use nowdrive_core::LinkConfig;

/// Radio bring-up failure
pub enum RadioError {
    Wifi(WifiError),
    EspNow(EspNowError),
}

impl Format for RadioError {
    fn format(&self, f: Formatter) {
        match self {
            RadioError::Wifi(e) => defmt::write!(f, "Wi-Fi: {}", Debug2Format(e)),
            RadioError::EspNow(e) => defmt::write!(f, "ESP-NOW: {}", Debug2Format(e)),
        }
    }
}

impl From<WifiError> for RadioError {
    fn from(e: WifiError) -> Self {
        RadioError::Wifi(e)
    }
}

impl From<EspNowError> for RadioError {
    fn from(e: EspNowError) -> Self {
        RadioError::EspNow(e)
    }
}

/// Running radio
///
/// The controller must outlive the receiver; dropping it stops Wi-Fi.
pub struct Radio {
    pub controller: WifiController<'static>,
    pub receiver: EspNowReceiver<'static>,
}

/// Bring the radio up for ESP-NOW reception
pub fn start(
    wifi_init: &'static EspWifiController<'static>,
    wifi: WIFI<'static>,
    link: &LinkConfig,
) -> Result<Radio, RadioError> {
    let (mut controller, interfaces) = wifi::new(wifi_init, wifi)?;

    controller.set_mode(WifiMode::Sta)?;
    if link.long_range {
        controller.set_protocol(Protocol::P802D11BGNLR.into())?;
        info!("Long-range mode enabled");
    }
    controller.start()?;

    let esp_now = interfaces.esp_now;
    esp_now.set_channel(link.channel)?;
    esp_now.set_pmk(&link.pmk)?;
    info!("ESP-NOW version {}", esp_now.version()?);

    // Only the receive half is used
    let (_manager, _sender, receiver) = esp_now.split();

    Ok(Radio {
        controller,
        receiver,
    })
}
