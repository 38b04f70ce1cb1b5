//! Four-line drive bank
//!
//! Owns the up/down/right/left lines and exposes them to the consumer as an
//! [`OutputBank`]. The capability has no error channel, so a failed pin
//! write is logged and the line keeps its previous logical state.

use embedded_hal::digital::OutputPin;
use nowdrive_core::{Level, Line, OutputBank};

use super::gpio::GpioLine;

/// The four drive lines, indexed by [`Line::id`]
pub struct PinBank<P> {
    lines: [GpioLine<P>; 4],
}

impl<P: OutputPin> PinBank<P> {
    /// Assemble a bank from its four lines
    pub fn new(up: GpioLine<P>, down: GpioLine<P>, right: GpioLine<P>, left: GpioLine<P>) -> Self {
        Self {
            lines: [up, down, right, left],
        }
    }

    /// Access one line
    pub fn line(&self, line: Line) -> &GpioLine<P> {
        &self.lines[line.id() as usize]
    }

    /// Logical state of every line, in [`Line::ALL`] order
    pub fn levels(&self) -> [bool; 4] {
        Line::ALL.map(|line| self.line(line).is_asserted())
    }

    /// Give the pins back, in [`Line::ALL`] order
    pub fn release(self) -> [P; 4] {
        self.lines.map(GpioLine::release)
    }
}

impl<P: OutputPin> OutputBank for PinBank<P> {
    fn set_output(&mut self, line: Line, level: Level) {
        if self.lines[line.id() as usize]
            .set_asserted(level.into())
            .is_err()
        {
            #[cfg(feature = "defmt")]
            defmt::warn!("Failed to set output line {}", line);
        }
    }
}
