//! Payload ownership tests backed by a counting allocator
//!
//! Only byte buffers (alignment 1) are counted, and only on the allocating
//! thread, so allocations made by the test harness or the time driver thread
//! do not show up. The same thread can also arm a one-shot failure for its
//! next byte buffer.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

use embassy_futures::block_on;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Instant};
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, TestRunner};

use nowdrive_core::{
    Consumer, DriveState, IngestConfig, IngestError, Ingestor, Level, Line, LinkStats, MacAddress,
    OutputBank, Payload, ReceiveEvent, SendStatus,
};

struct CountingAlloc;

thread_local! {
    static LIVE_BUFFERS: Cell<isize> = const { Cell::new(0) };
    static FAIL_NEXT_BUFFER: Cell<bool> = const { Cell::new(false) };
}

fn track(delta: isize, layout: Layout) {
    if layout.align() == 1 {
        let _ = LIVE_BUFFERS.try_with(|live| live.set(live.get() + delta));
    }
}

/// Consume the armed failure if this is a byte buffer
fn should_fail(layout: Layout) -> bool {
    layout.align() == 1 && FAIL_NEXT_BUFFER.try_with(|fail| fail.replace(false)).unwrap_or(false)
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if should_fail(layout) {
            return std::ptr::null_mut();
        }
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            track(1, layout);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        track(-1, layout);
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

fn live_buffers() -> isize {
    LIVE_BUFFERS.with(Cell::get)
}

/// Make the next byte buffer allocation on this thread return null
fn fail_next_buffer() {
    FAIL_NEXT_BUFFER.with(|fail| fail.set(true));
}

const TRANSMITTER: MacAddress = MacAddress::new([0x24, 0x6F, 0x28, 0x01, 0x02, 0x03]);
const RECEIVER: MacAddress = MacAddress::new([0x24, 0x6F, 0x28, 0x0A, 0x0B, 0x0C]);

/// Output bank that discards writes
struct NullBank;

impl OutputBank for NullBank {
    fn set_output(&mut self, _line: Line, _level: Level) {}
}

/// One randomized trip through the pipeline
#[derive(Debug, Clone)]
enum Cycle {
    /// Valid frame, ingested and consumed
    Packet(Vec<u8>),
    /// 0-1 byte payload handed straight to the consumer
    Short(Vec<u8>),
    /// Reserved send-completion event
    SendCompleted(bool),
    /// Malformed frame rejected at ingestion
    Rejected(i32),
    /// Frame dropped because the queue is full
    QueueFull(Vec<u8>),
}

fn cycle_strategy() -> impl Strategy<Value = Cycle> {
    prop_oneof![
        4 => proptest::collection::vec(any::<u8>(), 1..=250).prop_map(Cycle::Packet),
        2 => proptest::collection::vec(any::<u8>(), 0..=1).prop_map(Cycle::Short),
        1 => any::<bool>().prop_map(Cycle::SendCompleted),
        1 => (i32::MIN..=0).prop_map(Cycle::Rejected),
        1 => proptest::collection::vec(any::<u8>(), 1..=250).prop_map(Cycle::QueueFull),
    ]
}

fn fast_config() -> IngestConfig {
    IngestConfig {
        enqueue_timeout_ms: 1,
        ..Default::default()
    }
}

/// Start the time driver so its one-time setup is not counted
fn warm_up_time_driver() {
    let queue: Channel<NoopRawMutex, ReceiveEvent, 1> = Channel::new();
    let stats = LinkStats::new();
    let ingestor = Ingestor::new(queue.sender(), &stats, fast_config());
    block_on(async {
        let _ = ingestor.ingest(&TRANSMITTER, &RECEIVER, &[1]).await;
        let _ = ingestor.ingest(&TRANSMITTER, &RECEIVER, &[2]).await;
    });
    let _ = queue.try_receive();
}

fn run_cycle(cycle: &Cycle) -> Result<(), TestCaseError> {
    let queue: Channel<NoopRawMutex, ReceiveEvent, 1> = Channel::new();
    let stats = LinkStats::new();
    let ingestor = Ingestor::new(queue.sender(), &stats, fast_config());
    let mut consumer = Consumer::new(queue.receiver(), NullBank, &stats);

    let baseline = live_buffers();

    match cycle {
        Cycle::Packet(data) => {
            prop_assert!(block_on(ingestor.ingest(&TRANSMITTER, &RECEIVER, data)).is_ok());
            prop_assert_eq!(live_buffers(), baseline + 1);
            prop_assert!(block_on(consumer.process_next()).is_some());
        }
        Cycle::Short(data) => {
            let event = ReceiveEvent::PacketReceived {
                source: TRANSMITTER,
                payload: Payload::copy_from(data).unwrap(),
            };
            // A zero-length box needs no allocation
            let expected = if data.is_empty() { 0 } else { 1 };
            prop_assert_eq!(live_buffers(), baseline + expected);
            prop_assert_eq!(consumer.handle(event), Some(DriveState::from_payload(data)));
        }
        Cycle::SendCompleted(ok) => {
            let status = if *ok { SendStatus::Success } else { SendStatus::Failure };
            queue
                .try_send(ReceiveEvent::SendCompleted {
                    peer: TRANSMITTER,
                    status,
                })
                .unwrap();
            prop_assert_eq!(block_on(consumer.process_next()), None);
        }
        Cycle::Rejected(len) => {
            let result = block_on(ingestor.on_packet_received(
                Some(&TRANSMITTER),
                &RECEIVER,
                Some(&[7u8, 7][..]),
                *len,
            ));
            prop_assert_eq!(result, Err(IngestError::InvalidLength(*len)));
        }
        Cycle::QueueFull(data) => {
            prop_assert!(block_on(ingestor.ingest(&TRANSMITTER, &RECEIVER, data)).is_ok());
            let result = block_on(ingestor.ingest(&TRANSMITTER, &RECEIVER, data));
            prop_assert_eq!(result, Err(IngestError::QueueFull));
            // Only the queued frame is still alive
            prop_assert_eq!(live_buffers(), baseline + 1);
            prop_assert!(block_on(consumer.process_next()).is_some());
        }
    }

    prop_assert_eq!(live_buffers(), baseline);
    prop_assert!(queue.is_empty());
    Ok(())
}

#[test]
fn test_every_payload_released_exactly_once() {
    warm_up_time_driver();

    let mut runner = TestRunner::new(ProptestConfig {
        cases: 10_000,
        failure_persistence: None,
        ..ProptestConfig::default()
    });
    runner.run(&cycle_strategy(), |cycle| run_cycle(&cycle)).unwrap();
}

#[test]
fn test_sustained_pressure_is_bounded_and_leak_free() {
    const CAPACITY: usize = 4;
    const FRAMES: usize = 40;

    warm_up_time_driver();

    let queue: Channel<NoopRawMutex, ReceiveEvent, CAPACITY> = Channel::new();
    let stats = LinkStats::new();
    let config = IngestConfig {
        enqueue_timeout_ms: 5,
        ..Default::default()
    };
    let ingestor = Ingestor::new(queue.sender(), &stats, config);

    let baseline = live_buffers();
    let bound = config.enqueue_timeout() + Duration::from_millis(200);

    let mut dropped = 0;
    for i in 0..FRAMES {
        let start = Instant::now();
        let result = block_on(ingestor.ingest(&TRANSMITTER, &RECEIVER, &[i as u8, 0x80]));
        assert!(start.elapsed() < bound, "frame {} waited too long", i);
        if result == Err(IngestError::QueueFull) {
            dropped += 1;
        }
    }

    assert_eq!(dropped, FRAMES - CAPACITY);
    assert_eq!(live_buffers(), baseline + CAPACITY as isize);
    assert_eq!(stats.snapshot().dropped_queue_full, (FRAMES - CAPACITY) as u32);

    // The survivors are the oldest frames, in order
    let mut consumer = Consumer::new(queue.receiver(), NullBank, &stats);
    for i in 0..CAPACITY {
        let state = block_on(consumer.process_next());
        assert_eq!(state, Some(DriveState::from_payload(&[i as u8, 0x80])));
    }
    assert_eq!(live_buffers(), baseline);
}

#[test]
fn test_allocation_failure_drops_frame() {
    warm_up_time_driver();

    let queue: Channel<NoopRawMutex, ReceiveEvent, 4> = Channel::new();
    let stats = LinkStats::new();
    let ingestor = Ingestor::new(queue.sender(), &stats, fast_config());

    let baseline = live_buffers();
    let data = [0u8; 77];

    fail_next_buffer();
    let result = block_on(ingestor.ingest(&TRANSMITTER, &RECEIVER, &data));

    assert_eq!(result, Err(IngestError::OutOfMemory));
    assert!(queue.is_empty());
    assert_eq!(live_buffers(), baseline);

    let snap = stats.snapshot();
    assert_eq!(snap.dropped_no_memory, 1);
    assert_eq!(snap.dropped_queue_full, 0);

    // The next frame allocates normally
    assert!(block_on(ingestor.ingest(&TRANSMITTER, &RECEIVER, &data)).is_ok());
    assert_eq!(queue.len(), 1);
    assert_eq!(live_buffers(), baseline + 1);
}
