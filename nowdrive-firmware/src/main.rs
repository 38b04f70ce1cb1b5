//! nowdrive - ESP-NOW joystick receiver
//!
//! Main firmware binary for ESP32-C3 boards. Receives two-byte joystick
//! frames over ESP-NOW and drives four direction lines:
//!
//! | Line  | GPIO  |
//! |-------|-------|
//! | up    | GPIO0 |
//! | down  | GPIO1 |
//! | right | GPIO2 |
//! | left  | GPIO3 |

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Ticker};
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Level, Output, OutputConfig, Pull};
use esp_hal::interrupt::software::SoftwareInterruptControl;
use esp_hal::interrupt::Priority;
use esp_hal::rng::Rng;
use esp_hal::timer::systimer::SystemTimer;
use esp_hal::timer::timg::TimerGroup;
use esp_hal_embassy::InterruptExecutor;
use esp_wifi::wifi::WifiController;
use esp_wifi::EspWifiController;
use static_cell::StaticCell;
use {defmt_rtt as _, esp_backtrace as _};

use nowdrive_core::{Consumer, Ingestor, LinkStats};
use nowdrive_drivers::{GpioLine, PinBank};

use crate::channels::ReceiveQueue;

mod channels;
mod config;
mod radio;
mod tasks;

esp_bootloader_esp_idf::esp_app_desc!();

// Heap: Wi-Fi driver buffers plus receive payloads
const HEAP_SIZE: usize = 72 * 1024;

/// Link statistics heartbeat interval
const HEARTBEAT_INTERVAL_SECS: u64 = 60;

// Static cells for state shared with tasks (must live forever)
static WIFI_INIT: StaticCell<EspWifiController<'static>> = StaticCell::new();
static WIFI_CONTROLLER: StaticCell<WifiController<'static>> = StaticCell::new();
static RECEIVE_QUEUE: StaticCell<ReceiveQueue> = StaticCell::new();
static LINK_STATS: StaticCell<LinkStats> = StaticCell::new();
static RADIO_EXECUTOR: StaticCell<InterruptExecutor<2>> = StaticCell::new();

/// Main entry point
#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    info!("nowdrive receiver starting...");

    let peripherals = esp_hal::init(esp_hal::Config::default().with_cpu_clock(CpuClock::max()));
    esp_alloc::heap_allocator!(size: HEAP_SIZE);

    let systimer = SystemTimer::new(peripherals.SYSTIMER);
    esp_hal_embassy::init(systimer.alarm0);
    info!("Peripherals initialized");

    let link = config::link_config();
    let ingest = config::ingest_config();

    // Drive outputs come up low, before any frame can arrive
    // Pin assignments are board-specific
    let pin_config = OutputConfig::default().with_pull(Pull::Up);
    let outputs = PinBank::new(
        drive_line(Output::new(peripherals.GPIO0, Level::Low, pin_config)),
        drive_line(Output::new(peripherals.GPIO1, Level::Low, pin_config)),
        drive_line(Output::new(peripherals.GPIO2, Level::Low, pin_config)),
        drive_line(Output::new(peripherals.GPIO3, Level::Low, pin_config)),
    );
    info!("Drive outputs initialized");

    // Queue and counters exist before either side runs
    let queue: &'static ReceiveQueue = RECEIVE_QUEUE.init(Channel::new());
    let stats: &'static LinkStats = LINK_STATS.init(LinkStats::new());

    let consumer = Consumer::new(queue.receiver(), outputs, stats);
    spawner.spawn(tasks::drive_task(consumer)).unwrap();

    // Radio
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let wifi_init = match esp_wifi::init(timg0.timer0, Rng::new(peripherals.RNG)) {
        Ok(init) => WIFI_INIT.init(init),
        Err(e) => defmt::panic!("Wi-Fi init failed: {}", Debug2Format(&e)),
    };
    let radio = match radio::start(wifi_init, peripherals.WIFI, &link) {
        Ok(radio) => radio,
        Err(e) => defmt::panic!("Radio start failed: {}", e),
    };
    WIFI_CONTROLLER.init(radio.controller);
    info!("ESP-NOW listening on channel {}", link.channel);

    // Receive path runs above the thread executor so it never waits on the drive task
    let sw_ints = SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    let executor = RADIO_EXECUTOR.init(InterruptExecutor::new(sw_ints.software_interrupt2));
    let radio_spawner = executor.start(Priority::Priority3);

    let ingestor = Ingestor::new(queue.sender(), stats, ingest);
    radio_spawner
        .spawn(tasks::receive_task(radio.receiver, ingestor))
        .unwrap();

    info!("All tasks spawned, receiver running");

    let mut heartbeat = Ticker::every(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));
    loop {
        heartbeat.next().await;
        let snap = stats.snapshot();
        info!(
            "Link: rx={} bcast={} ucast={} rejected={} dropped={} applied={}",
            snap.received,
            snap.broadcast,
            snap.unicast,
            snap.rejected,
            snap.dropped(),
            snap.applied
        );
    }
}

/// Active-high drive line on a push-pull output
///
/// GPIO writes on this chip cannot fail.
fn drive_line(pin: Output<'static>) -> GpioLine<Output<'static>> {
    match GpioLine::new_active_high(pin) {
        Ok(line) => line,
        Err(e) => match e {},
    }
}
