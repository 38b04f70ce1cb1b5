//! Event consumer
//!
//! Runs as an ordinary task below the receive context. Waits on the queue,
//! decodes each frame with the decision table and writes all four output
//! lines before taking the next event. No state carries over between
//! frames.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Receiver;

use crate::drive::{AxisSample, DriveState};
use crate::event::ReceiveEvent;
use crate::stats::LinkStats;
use crate::traits::OutputBank;

/// Consumer side of the receive pipeline
pub struct Consumer<'a, M: RawMutex, B: OutputBank, const N: usize> {
    queue: Receiver<'a, M, ReceiveEvent, N>,
    outputs: B,
    stats: &'a LinkStats,
}

impl<'a, M: RawMutex, B: OutputBank, const N: usize> Consumer<'a, M, B, N> {
    /// Create a consumer draining `queue` into `outputs`
    ///
    /// All lines are driven to neutral before the first event.
    pub fn new(queue: Receiver<'a, M, ReceiveEvent, N>, mut outputs: B, stats: &'a LinkStats) -> Self {
        outputs.apply(&DriveState::NEUTRAL);
        Self {
            queue,
            outputs,
            stats,
        }
    }

    /// Process events forever
    pub async fn run(&mut self) {
        loop {
            self.process_next().await;
        }
    }

    /// Wait for one event and handle it
    ///
    /// Returns the state written to the outputs, or `None` for events that
    /// do not touch them.
    pub async fn process_next(&mut self) -> Option<DriveState> {
        let event = self.queue.receive().await;
        self.handle(event)
    }

    /// Handle one dequeued event, taking ownership of its payload
    pub fn handle(&mut self, event: ReceiveEvent) -> Option<DriveState> {
        match event {
            ReceiveEvent::PacketReceived { source, payload } => {
                let sample = AxisSample::from_payload(payload.as_bytes());
                drop(payload);

                let state = DriveState::from_sample(sample);
                log_trace!(
                    "{:?}: x={} y={} -> {:?}",
                    source,
                    sample.x,
                    sample.y,
                    state
                );
                self.outputs.apply(&state);
                self.stats.record_applied();
                Some(state)
            }
            ReceiveEvent::SendCompleted { peer, status } => {
                log_trace!("Send to {:?} completed: {:?}", peer, status);
                None
            }
        }
    }

    /// The output bank being driven
    pub fn outputs(&self) -> &B {
        &self.outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::{Horizontal, Line, Vertical};
    use crate::event::SendStatus;
    use crate::link::MacAddress;
    use crate::traits::Level;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embassy_sync::channel::Channel;

    const PEER: MacAddress = MacAddress::new([0x24, 0x6F, 0x28, 0x10, 0x20, 0x30]);

    /// Output bank that remembers the current level of each line
    #[derive(Default)]
    struct MockBank {
        levels: [bool; 4],
        writes: usize,
    }

    impl OutputBank for MockBank {
        fn set_output(&mut self, line: Line, level: Level) {
            self.levels[line.id() as usize] = level.into();
            self.writes += 1;
        }
    }

    fn packet(data: &[u8]) -> ReceiveEvent {
        ReceiveEvent::packet(PEER, data).unwrap()
    }

    #[test]
    fn test_new_drives_neutral() {
        let queue: Channel<NoopRawMutex, ReceiveEvent, 2> = Channel::new();
        let stats = LinkStats::new();
        let bank = MockBank {
            levels: [true; 4],
            writes: 0,
        };
        let consumer = Consumer::new(queue.receiver(), bank, &stats);
        assert_eq!(consumer.outputs().levels, [false; 4]);
        assert_eq!(consumer.outputs().writes, 4);
    }

    #[test]
    fn test_packet_drives_outputs() {
        let queue: Channel<NoopRawMutex, ReceiveEvent, 2> = Channel::new();
        let stats = LinkStats::new();
        let mut consumer = Consumer::new(queue.receiver(), MockBank::default(), &stats);

        let state = consumer.handle(packet(&[255, 0]));
        assert_eq!(state, Some(DriveState::new(Vertical::Down, Horizontal::Right)));
        // up, down, right, left
        assert_eq!(consumer.outputs().levels, [false, true, true, false]);

        consumer.handle(packet(&[128, 128]));
        assert_eq!(consumer.outputs().levels, [false; 4]);
        assert_eq!(stats.snapshot().applied, 2);
    }

    #[test]
    fn test_short_payloads_do_not_panic() {
        let queue: Channel<NoopRawMutex, ReceiveEvent, 2> = Channel::new();
        let stats = LinkStats::new();
        let mut consumer = Consumer::new(queue.receiver(), MockBank::default(), &stats);

        // One byte: x=128 (neutral), y missing -> 0 (down)
        let state = consumer.handle(packet(&[128]));
        assert_eq!(state, Some(DriveState::new(Vertical::Down, Horizontal::Neutral)));

        // Zero bytes can only come from a hand-built event
        let empty = ReceiveEvent::PacketReceived {
            source: PEER,
            payload: crate::event::Payload::copy_from(&[]).unwrap(),
        };
        let state = consumer.handle(empty);
        assert_eq!(state, Some(DriveState::new(Vertical::Down, Horizontal::Left)));
    }

    #[test]
    fn test_no_history_between_events() {
        let queue: Channel<NoopRawMutex, ReceiveEvent, 2> = Channel::new();
        let stats = LinkStats::new();
        let mut consumer = Consumer::new(queue.receiver(), MockBank::default(), &stats);

        consumer.handle(packet(&[100, 255]));
        // y missing here must read 0, not the previous 255
        let state = consumer.handle(packet(&[100]));
        assert_eq!(state.map(|s| s.vertical()), Some(Vertical::Down));
    }

    #[test]
    fn test_send_completed_is_noop() {
        let queue: Channel<NoopRawMutex, ReceiveEvent, 2> = Channel::new();
        let stats = LinkStats::new();
        let mut consumer = Consumer::new(queue.receiver(), MockBank::default(), &stats);
        let writes_before = consumer.outputs().writes;

        let state = consumer.handle(ReceiveEvent::SendCompleted {
            peer: PEER,
            status: SendStatus::Success,
        });

        assert_eq!(state, None);
        assert_eq!(consumer.outputs().writes, writes_before);
        assert_eq!(stats.snapshot().applied, 0);
    }

    #[test]
    fn test_process_next_is_fifo() {
        let queue: Channel<NoopRawMutex, ReceiveEvent, 4> = Channel::new();
        let stats = LinkStats::new();
        let mut consumer = Consumer::new(queue.receiver(), MockBank::default(), &stats);

        for data in [[0u8, 0], [255, 255], [0, 255]] {
            queue.try_send(packet(&data)).unwrap();
        }

        let expected = [
            DriveState::new(Vertical::Down, Horizontal::Left),
            DriveState::new(Vertical::Up, Horizontal::Right),
            DriveState::new(Vertical::Up, Horizontal::Left),
        ];
        for want in expected {
            assert_eq!(block_on(consumer.process_next()), Some(want));
        }
        assert!(queue.is_empty());
    }
}
