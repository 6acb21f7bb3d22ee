//! Hardware-independent core of the tonebox synth firmware.
//!
//! The firmware turns a physical input (key matrix, potentiometer or
//! stylus strip) into a square-wave tone on a PWM pin. Everything that can
//! be decided without touching registers lives here so it can be unit
//! tested on the host:
//!
//! ```text
//! sampler / keypad ──► mapper ──► tone ──► ToneOutput (PWM slice)
//!        shift ─────────┘
//! command ──► flags ◄── button
//!               └─────► melody
//! ```
//!
//! # Crate Features
//!
//! - **`defmt`**: `defmt::Format` derives on public types and log
//!   statements at points of interest.

#![no_std]

pub mod button;
pub mod command;
pub mod error;
pub mod flags;
pub mod keypad;
pub mod mapper;
pub mod melody;
pub mod sampler;
pub mod shift;
pub mod tone;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use button::DebouncedButton;
pub use command::{dispatch, Command, Response};
pub use error::{CommandError, ConfigError, KeypadError};
pub use flags::{ControlFlags, LedMode};
pub use mapper::{key_frequency, LinearConfig, RcOscillatorConfig, KEY_TABLE};
pub use melody::{play_tune, Note, Playback, PRESET_TUNE};
pub use sampler::{AnalogSource, Oversampler, SamplerConfig};
pub use shift::{ModeIndicator, Press, PressTracker, ShiftConfig, ShiftMode};
pub use tone::{TimerClock, TimerSettings, ToneGenerator, ToneOutput};
