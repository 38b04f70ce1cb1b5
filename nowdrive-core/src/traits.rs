//! Output capability
//!
//! The consumer drives its four lines through this trait so it can run
//! against real pins on target and against recorders in tests.

use crate::drive::{DriveState, Line};

/// Logic level of an output line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(asserted: bool) -> Self {
        if asserted {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> Self {
        level == Level::High
    }
}

/// Four independently addressable digital output lines
///
/// Writes are synchronous and cannot fail from the caller's point of view.
pub trait OutputBank {
    /// Set one line to `level`
    fn set_output(&mut self, line: Line, level: Level);

    /// Write all four lines of `state`, in [`Line::ALL`] order
    fn apply(&mut self, state: &DriveState) {
        for line in Line::ALL {
            self.set_output(line, state.is_asserted(line).into());
        }
    }
}

impl<T: OutputBank + ?Sized> OutputBank for &mut T {
    fn set_output(&mut self, line: Line, level: Level) {
        (**self).set_output(line, level);
    }

    fn apply(&mut self, state: &DriveState) {
        (**self).apply(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::{Horizontal, Vertical};

    struct Recorder {
        writes: Vec<(Line, Level)>,
    }

    impl OutputBank for Recorder {
        fn set_output(&mut self, line: Line, level: Level) {
            self.writes.push((line, level));
        }
    }

    #[test]
    fn test_level_conversions() {
        assert_eq!(Level::from(true), Level::High);
        assert_eq!(Level::from(false), Level::Low);
        assert!(bool::from(Level::High));
        assert!(!bool::from(Level::Low));
    }

    #[test]
    fn test_apply_writes_every_line_in_order() {
        let mut bank = Recorder { writes: Vec::new() };
        bank.apply(&DriveState::new(Vertical::Down, Horizontal::Right));

        assert_eq!(
            bank.writes,
            [
                (Line::Up, Level::Low),
                (Line::Down, Level::High),
                (Line::Right, Level::High),
                (Line::Left, Level::Low),
            ]
        );
    }

    #[test]
    fn test_apply_through_mut_ref() {
        fn drive<B: OutputBank>(mut bank: B) {
            bank.apply(&DriveState::NEUTRAL);
        }

        let mut bank = Recorder { writes: Vec::new() };
        drive(&mut bank);
        assert_eq!(bank.writes.len(), 4);
        assert!(bank.writes.iter().all(|(_, level)| *level == Level::Low));
    }
}
