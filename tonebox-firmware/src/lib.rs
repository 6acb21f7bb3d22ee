//! Board support shared by the tonebox firmware binaries.
//!
//! Each binary in `src/bin/` is one instrument variant for the Raspberry
//! Pi Pico 2:
//!
//! - `keypad-synth`: 5×5 key matrix, octave shift button, mode LED.
//! - `pot-synth`: potentiometer as a 555 timing resistor, UART commands,
//!   preset tune, two buttons.
//! - `stylus-synth`: stylus on a resistive strip, linear pitch.
//!
//! All variants put the tone on GP14 (PWM slice 7 A) and its inverted
//! mirror on GP15 (slice 7 B).

#![no_std]

pub mod analog;
pub mod pwm_tone;
pub mod serial;

pub use analog::AdcInput;
pub use pwm_tone::PwmTone;

/// Counter rate of the tone PWM slice.
pub const TONE_TICK_HZ: u32 = 1_000_000;

/// Poll interval of the synth loops.
pub const LOOP_TICK_MS: u64 = 1;
