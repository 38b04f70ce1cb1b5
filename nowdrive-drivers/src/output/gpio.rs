//! GPIO output line
//!
//! One drive signal on one GPIO pin, wired directly or through a driver
//! stage that may invert it.

use embedded_hal::digital::{OutputPin, PinState};

/// A drive line on a GPIO pin
///
/// The pin can be configured as active-high (default) or active-low.
pub struct GpioLine<P> {
    pin: P,
    /// If true, asserted = pin LOW
    inverted: bool,
    /// Current logical state (true = asserted)
    asserted: bool,
}

impl<P: OutputPin> GpioLine<P> {
    /// Create a new line, driven to its deasserted level
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin to control
    /// - `inverted`: If true, the line is asserted when the pin is LOW
    pub fn new(pin: P, inverted: bool) -> Result<Self, P::Error> {
        let mut line = Self {
            pin,
            inverted,
            asserted: false,
        };
        line.set_asserted(false)?;
        Ok(line)
    }

    /// Create a new active-high line
    pub fn new_active_high(pin: P) -> Result<Self, P::Error> {
        Self::new(pin, false)
    }

    /// Create a new active-low line
    pub fn new_active_low(pin: P) -> Result<Self, P::Error> {
        Self::new(pin, true)
    }

    /// Assert or deassert the line
    ///
    /// The logical state only changes if the pin write succeeds.
    pub fn set_asserted(&mut self, asserted: bool) -> Result<(), P::Error> {
        // Normal: asserted=true, inverted=false → high
        // Inverted: asserted=true, inverted=true → low
        let state = PinState::from(asserted != self.inverted);
        self.pin.set_state(state)?;
        self.asserted = asserted;
        Ok(())
    }

    /// Whether the line is currently asserted
    pub fn is_asserted(&self) -> bool {
        self.asserted
    }

    /// Whether the line is active-low
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Give the pin back
    pub fn release(self) -> P {
        self.pin
    }
}
