//! Hardware driver implementations
//!
//! Concrete implementations of the output capability defined in
//! nowdrive-core, built on `embedded-hal` digital pins:
//!
//! - Single GPIO output line with optional inversion
//! - Four-line drive bank (up, down, right, left)

#![no_std]
#![deny(unsafe_code)]

pub mod output;

pub use output::{GpioLine, PinBank};
