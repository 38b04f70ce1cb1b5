//! Joystick decision table
//!
//! Maps the two axis bytes of a control payload onto four drive lines.
//!
//! | Axis       | Byte | Asserted line     | Neutral    |
//! |------------|------|-------------------|------------|
//! | Vertical   | 1    | up `> 190`, down `< 20` | `20..=190` |
//! | Horizontal | 0    | right `> 240`, left `== 0` | `1..=240` |
//!
//! The two axes are calibrated differently on purpose. Left fires only on an
//! exact zero, not a band.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Vertical axis above this drives "up"
pub const UP_THRESHOLD: u8 = 190;
/// Vertical axis below this drives "down"
pub const DOWN_THRESHOLD: u8 = 20;
/// Horizontal axis above this drives "right"
pub const RIGHT_THRESHOLD: u8 = 240;
/// Horizontal axis equal to this drives "left"
pub const LEFT_VALUE: u8 = 0;

/// One of the four drive output lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Line {
    Up = 0,
    Down = 1,
    Right = 2,
    Left = 3,
}

impl Line {
    /// All lines in output order
    pub const ALL: [Line; 4] = [Line::Up, Line::Down, Line::Right, Line::Left];

    /// Numeric line id (0-3)
    pub fn id(self) -> u8 {
        self as u8
    }
}

/// Vertical axis decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Vertical {
    Up,
    Down,
    Neutral,
}

impl Vertical {
    /// Decide the vertical direction from the Y axis byte
    pub fn decide(axis_y: u8) -> Self {
        if axis_y > UP_THRESHOLD {
            Vertical::Up
        } else if axis_y < DOWN_THRESHOLD {
            Vertical::Down
        } else {
            Vertical::Neutral
        }
    }
}

/// Horizontal axis decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Horizontal {
    Right,
    Left,
    Neutral,
}

impl Horizontal {
    /// Decide the horizontal direction from the X axis byte
    pub fn decide(axis_x: u8) -> Self {
        if axis_x > RIGHT_THRESHOLD {
            Horizontal::Right
        } else if axis_x == LEFT_VALUE {
            Horizontal::Left
        } else {
            Horizontal::Neutral
        }
    }
}

/// The two axis bytes of a control payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisSample {
    /// Horizontal axis (byte 0)
    pub x: u8,
    /// Vertical axis (byte 1)
    pub y: u8,
}

impl AxisSample {
    /// Read up to two bytes from a payload
    ///
    /// Missing bytes read as 0. Bytes past the second are ignored.
    pub fn from_payload(data: &[u8]) -> Self {
        let mut axes = [0u8; 2];
        for (slot, byte) in axes.iter_mut().zip(data) {
            *slot = *byte;
        }
        Self {
            x: axes[0],
            y: axes[1],
        }
    }
}

/// Levels of the four drive lines
///
/// Built from one decision per axis, so at most one line per pair is ever
/// asserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriveState {
    vertical: Vertical,
    horizontal: Horizontal,
}

impl Default for DriveState {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl DriveState {
    /// All four lines deasserted
    pub const NEUTRAL: Self = Self {
        vertical: Vertical::Neutral,
        horizontal: Horizontal::Neutral,
    };

    /// Combine one decision per axis
    pub const fn new(vertical: Vertical, horizontal: Horizontal) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }

    /// Apply the decision table to an axis sample
    pub fn from_sample(sample: AxisSample) -> Self {
        Self::new(Vertical::decide(sample.y), Horizontal::decide(sample.x))
    }

    /// Decode a raw payload, treating missing bytes as 0
    pub fn from_payload(data: &[u8]) -> Self {
        Self::from_sample(AxisSample::from_payload(data))
    }

    pub fn vertical(&self) -> Vertical {
        self.vertical
    }

    pub fn horizontal(&self) -> Horizontal {
        self.horizontal
    }

    pub fn up(&self) -> bool {
        self.vertical == Vertical::Up
    }

    pub fn down(&self) -> bool {
        self.vertical == Vertical::Down
    }

    pub fn right(&self) -> bool {
        self.horizontal == Horizontal::Right
    }

    pub fn left(&self) -> bool {
        self.horizontal == Horizontal::Left
    }

    /// Whether `line` is asserted in this state
    pub fn is_asserted(&self, line: Line) -> bool {
        match line {
            Line::Up => self.up(),
            Line::Down => self.down(),
            Line::Right => self.right(),
            Line::Left => self.left(),
        }
    }

    /// Levels of all four lines in [`Line::ALL`] order
    pub fn levels(&self) -> [bool; 4] {
        Line::ALL.map(|line| self.is_asserted(line))
    }
}
