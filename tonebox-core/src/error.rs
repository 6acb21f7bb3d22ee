//! Error types shared across the tonebox library.

use core::fmt;

/// A configuration struct holds values that cannot produce a tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Lower frequency bound is not below the upper bound.
    EmptyFrequencyRange,
    /// A frequency bound is zero, negative or not finite.
    InvalidFrequency,
    /// ADC full-scale value is zero.
    ZeroFullScale,
    /// A resistor or capacitor value is zero, negative or not finite.
    InvalidComponent,
    /// Minimum resistance is above the maximum resistance.
    EmptyResistanceRange,
    /// Oversample count is zero.
    ZeroOversample,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::EmptyFrequencyRange => write!(f, "min frequency must be below max frequency"),
            ConfigError::InvalidFrequency => write!(f, "frequency bounds must be positive and finite"),
            ConfigError::ZeroFullScale => write!(f, "ADC full scale must be non-zero"),
            ConfigError::InvalidComponent => write!(f, "component values must be positive and finite"),
            ConfigError::EmptyResistanceRange => write!(f, "min resistance must not exceed max resistance"),
            ConfigError::ZeroOversample => write!(f, "oversample count must be at least 1"),
        }
    }
}

/// A received serial byte does not name a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// The byte is not one of `I O F H T` (either case).
    Unrecognized(u8),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CommandError::Unrecognized(b) => write!(f, "unrecognized command byte 0x{:02x}", b),
        }
    }
}

/// A key-matrix pin reported an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeypadError {
    /// Driving a row pin failed.
    Row,
    /// Reading a column pin failed.
    Column,
}

impl fmt::Display for KeypadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KeypadError::Row => write!(f, "failed to drive keypad row"),
            KeypadError::Column => write!(f, "failed to read keypad column"),
        }
    }
}
