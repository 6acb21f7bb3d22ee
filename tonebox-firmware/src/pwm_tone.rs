//! [`ToneOutput`] for an RP2350 PWM slice.
//!
//! Channel A carries the tone. Channel B mirrors it inverted, the way a
//! 555's discharge pin goes low while the output is high; it can drive a
//! second transducer or a scope probe.

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pwm::{Config, Pwm};
use tonebox::tone::{TimerClock, TimerSettings, ToneOutput};

/// Largest prescaler the slice divider can hold: its integer part is
/// 8 bits and 0 means 256.
pub const MAX_PRESCALER: u16 = 254;

/// Tone driver owning one PWM slice with both channels routed to pins.
pub struct PwmTone<'d> {
    pwm: Pwm<'d>,
    config: Config,
}

impl<'d> PwmTone<'d> {
    /// Slice configuration to construct the [`Pwm`] with: counter stopped,
    /// both compares at zero, channel B inverted.
    pub fn idle_config() -> Config {
        let mut config = Config::default();
        config.enable = false;
        config.invert_b = true;
        config.compare_a = 0;
        config.compare_b = 0;
        config
    }

    /// Tone clock for a slice fed from `clk_sys`, with the prescaler kept
    /// within the divider's range.
    pub fn timer_clock(tick_hz: u32) -> TimerClock {
        TimerClock::for_tick_rate_limited(clk_sys_freq(), tick_hz, MAX_PRESCALER)
    }

    /// Wrap a slice created with [`idle_config`](Self::idle_config).
    pub fn new(pwm: Pwm<'d>) -> Self {
        Self {
            pwm,
            config: Self::idle_config(),
        }
    }
}

impl ToneOutput for PwmTone<'_> {
    fn apply(&mut self, settings: &TimerSettings) {
        let prescaler = if settings.prescaler > MAX_PRESCALER {
            defmt::warn!(
                "prescaler {} exceeds divider range, capped at {}",
                settings.prescaler,
                MAX_PRESCALER
            );
            MAX_PRESCALER
        } else {
            settings.prescaler
        };
        self.config.divider = (prescaler as u8 + 1).into();
        self.config.top = settings.period;
        self.config.compare_a = settings.compare;
        self.config.compare_b = settings.compare;
        self.pwm.set_config(&self.config);
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.config.enable = enabled;
        self.pwm.set_config(&self.config);
        defmt::trace!("PWM output {}", if enabled { "on" } else { "off" });
    }
}
