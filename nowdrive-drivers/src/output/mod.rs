//! Drive output lines

pub mod bank;
pub mod gpio;

pub use bank::PinBank;
pub use gpio::GpioLine;
