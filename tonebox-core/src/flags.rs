//! State shared between interrupt-driven tasks and the synth loop.
//!
//! Every field is a single atomic with no invariant spanning fields, so
//! `Relaxed` ordering is enough. A [`ControlFlags`] is meant to live in a
//! `static`:
//!
//! ```
//! use tonebox::flags::{ControlFlags, LedMode};
//!
//! static FLAGS: ControlFlags = ControlFlags::new();
//!
//! assert!(FLAGS.pwm_enabled());
//! assert_eq!(FLAGS.led_mode(), LedMode::Flashing);
//! assert!(FLAGS.toggle_play_preset());
//! ```

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Behaviour of the command-controlled status LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LedMode {
    Off = 0,
    On = 1,
    Flashing = 2,
}

impl LedMode {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => LedMode::Off,
            1 => LedMode::On,
            _ => LedMode::Flashing,
        }
    }

    /// LED level for this mode given the flasher's current phase.
    pub fn level(self, flash_phase: bool) -> bool {
        match self {
            LedMode::Off => false,
            LedMode::On => true,
            LedMode::Flashing => flash_phase,
        }
    }
}

/// Flags written from button/serial tasks and read by the synth loop.
pub struct ControlFlags {
    play_preset: AtomicBool,
    pwm_enabled: AtomicBool,
    led_mode: AtomicU8,
}

impl Default for ControlFlags {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlFlags {
    /// Boot state: no tune requested, PWM enabled, LED flashing.
    pub const fn new() -> Self {
        Self {
            play_preset: AtomicBool::new(false),
            pwm_enabled: AtomicBool::new(true),
            led_mode: AtomicU8::new(LedMode::Flashing as u8),
        }
    }

    pub fn play_preset(&self) -> bool {
        self.play_preset.load(Ordering::Relaxed)
    }

    pub fn set_play_preset(&self, on: bool) {
        self.play_preset.store(on, Ordering::Relaxed);
    }

    /// Flip the preset request; returns the new value.
    pub fn toggle_play_preset(&self) -> bool {
        !self.play_preset.fetch_xor(true, Ordering::Relaxed)
    }

    pub fn pwm_enabled(&self) -> bool {
        self.pwm_enabled.load(Ordering::Relaxed)
    }

    pub fn set_pwm_enabled(&self, on: bool) {
        self.pwm_enabled.store(on, Ordering::Relaxed);
    }

    /// Flip the PWM gate; returns the new value.
    pub fn toggle_pwm_enabled(&self) -> bool {
        !self.pwm_enabled.fetch_xor(true, Ordering::Relaxed)
    }

    pub fn led_mode(&self) -> LedMode {
        LedMode::from_raw(self.led_mode.load(Ordering::Relaxed))
    }

    pub fn set_led_mode(&self, mode: LedMode) {
        self.led_mode.store(mode as u8, Ordering::Relaxed);
    }

    /// A running tune continues only while it is still requested and the
    /// PWM output is enabled.
    pub fn keep_playing(&self) -> bool {
        self.play_preset() && self.pwm_enabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boot_state() {
        let flags = ControlFlags::new();
        assert!(!flags.play_preset());
        assert!(flags.pwm_enabled());
        assert_eq!(flags.led_mode(), LedMode::Flashing);
        assert!(!flags.keep_playing());
    }

    #[test]
    fn toggles_return_new_value() {
        let flags = ControlFlags::new();
        assert!(flags.toggle_play_preset());
        assert!(flags.play_preset());
        assert!(!flags.toggle_play_preset());
        assert!(!flags.toggle_pwm_enabled());
        assert!(!flags.pwm_enabled());
    }

    #[test]
    fn keep_playing_needs_both_flags() {
        let flags = ControlFlags::new();
        flags.set_play_preset(true);
        assert!(flags.keep_playing());
        flags.set_pwm_enabled(false);
        assert!(!flags.keep_playing());
    }

    #[test]
    fn led_mode_round_trips_through_atomic() {
        let flags = ControlFlags::new();
        for mode in [LedMode::Off, LedMode::On, LedMode::Flashing] {
            flags.set_led_mode(mode);
            assert_eq!(flags.led_mode(), mode);
        }
    }

    #[test]
    fn led_level() {
        assert!(!LedMode::Off.level(true));
        assert!(LedMode::On.level(false));
        assert!(LedMode::Flashing.level(true));
        assert!(!LedMode::Flashing.level(false));
    }
}
