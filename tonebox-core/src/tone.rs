//! PWM timer planning for square-wave tones.
//!
//! A PWM timer counts at `clock_hz / (prescaler + 1)` and wraps after
//! `period + 1` ticks, so the output frequency is
//!
//! ```text
//! f = clock_hz / (prescaler + 1) / (period + 1)
//! ```
//!
//! [`TimerClock::settings_for`] inverts that for a target frequency and
//! sets the compare register to `period / 2` for a 50 % duty square wave.
//! The period is clamped to `[MIN_PERIOD, MAX_PERIOD]`; frequencies that
//! are zero, negative or not finite produce no settings at all, and
//! [`ToneGenerator`] turns them into silence (compare = 0).

/// Shortest period the tone timer is ever programmed with.
pub const MIN_PERIOD: u16 = 10;
/// Longest period the 16-bit counter can hold.
pub const MAX_PERIOD: u16 = u16::MAX;

/// Register values for one tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerSettings {
    /// Clock division minus one.
    pub prescaler: u16,
    /// Counter wrap value (ARR / TOP).
    pub period: u16,
    /// Compare threshold; output is high while the counter is below it.
    pub compare: u16,
}

impl TimerSettings {
    /// `true` when the compare value keeps the output low.
    #[cfg(test)]
    pub(crate) fn is_silent(&self) -> bool {
        self.compare == 0
    }
}

/// Input clock and prescaler of the tone timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerClock {
    /// Timer input clock in Hz. Default: 150 MHz (RP2350 system clock).
    pub clock_hz: u32,
    /// Clock division minus one. Default: 149, for a 1 MHz tick.
    pub prescaler: u16,
}

impl Default for TimerClock {
    fn default() -> Self {
        Self::for_tick_rate(150_000_000, 1_000_000)
    }
}

impl TimerClock {
    /// Pick the prescaler that brings `clock_hz` closest to `tick_hz`
    /// from above.
    pub const fn for_tick_rate(clock_hz: u32, tick_hz: u32) -> Self {
        Self::for_tick_rate_limited(clock_hz, tick_hz, u16::MAX)
    }

    /// Like [`for_tick_rate`](Self::for_tick_rate) for timers whose
    /// divider is narrower than 16 bits. The prescaler is capped at
    /// `max_prescaler`, so the tick runs faster than asked and periods
    /// computed from this clock stay in step with the hardware.
    pub const fn for_tick_rate_limited(clock_hz: u32, tick_hz: u32, max_prescaler: u16) -> Self {
        let div = if tick_hz == 0 { u32::MAX } else { clock_hz / tick_hz };
        let prescaler = if div == 0 {
            0
        } else if div - 1 > max_prescaler as u32 {
            max_prescaler
        } else {
            (div - 1) as u16
        };
        Self { clock_hz, prescaler }
    }

    /// Counter rate after the prescaler.
    pub fn tick_hz(&self) -> f32 {
        self.clock_hz as f32 / (self.prescaler as f32 + 1.0)
    }

    /// Period and compare values for `freq_hz`, or `None` when the
    /// frequency cannot be played.
    ///
    /// ```
    /// use tonebox::tone::TimerClock;
    ///
    /// let clock = TimerClock::for_tick_rate(150_000_000, 1_000_000);
    /// let s = clock.settings_for(440.0).unwrap();
    /// assert_eq!(s.period, 2271);
    /// assert_eq!(s.compare, 1135);
    /// assert!(clock.settings_for(0.0).is_none());
    /// ```
    pub fn settings_for(&self, freq_hz: f32) -> Option<TimerSettings> {
        if !freq_hz.is_finite() || freq_hz <= 0.0 {
            return None;
        }
        let ticks = self.tick_hz() / freq_hz;
        let period = if ticks > MAX_PERIOD as f32 {
            MAX_PERIOD
        } else {
            ((ticks as u32).saturating_sub(1) as u16).max(MIN_PERIOD)
        };
        Some(TimerSettings {
            prescaler: self.prescaler,
            period,
            compare: period / 2,
        })
    }

    /// Frequency actually produced by `settings`.
    pub fn frequency_of(&self, settings: &TimerSettings) -> f32 {
        self.clock_hz as f32 / (settings.prescaler as f32 + 1.0) / (settings.period as f32 + 1.0)
    }
}

/// Compare value for `percent` duty (clamped to `[0, 100]`) at `period`.
pub fn compare_for_duty(period: u16, percent: f32) -> u16 {
    let percent = if percent.is_nan() { 0.0 } else { percent.max(0.0).min(100.0) };
    let compare = (percent / 100.0) * (period as f32 + 1.0);
    if compare >= u16::MAX as f32 {
        u16::MAX
    } else {
        compare as u16
    }
}

// ── Hardware seam ───────────────────────────────────────────────────────

/// A PWM channel that can be reprogrammed and gated.
pub trait ToneOutput {
    /// Write prescaler, period and compare registers.
    fn apply(&mut self, settings: &TimerSettings);
    /// Start or stop the PWM output.
    fn set_enabled(&mut self, enabled: bool);
}

/// Owns a [`ToneOutput`] and translates frequencies into register writes.
///
/// Identical consecutive settings are written only once, so calling
/// [`play`](Self::play) every loop tick with a steady input does not
/// disturb the running waveform.
pub struct ToneGenerator<T> {
    output: T,
    clock: TimerClock,
    current: Option<TimerSettings>,
    enabled: bool,
}

impl<T: ToneOutput> ToneGenerator<T> {
    /// Wrap `output`. No registers are written until the first call.
    pub fn new(output: T, clock: TimerClock) -> Self {
        Self {
            output,
            clock,
            current: None,
            enabled: false,
        }
    }

    /// Clock the settings are computed against.
    pub fn clock(&self) -> &TimerClock {
        &self.clock
    }

    /// Last settings written to the hardware.
    pub fn current(&self) -> Option<TimerSettings> {
        self.current
    }

    /// Whether the output was last switched on.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Program the timer for `freq_hz`. Unplayable frequencies silence
    /// the output instead.
    pub fn play(&mut self, freq_hz: f32) -> TimerSettings {
        match self.clock.settings_for(freq_hz) {
            Some(settings) => {
                self.write(settings);
                settings
            }
            None => self.silence(),
        }
    }

    /// Drop the compare value to zero, keeping the period.
    pub fn silence(&mut self) -> TimerSettings {
        let settings = TimerSettings {
            prescaler: self.clock.prescaler,
            period: self.current.map_or(MAX_PERIOD, |s| s.period),
            compare: 0,
        };
        self.write(settings);
        settings
    }

    /// Change the duty cycle of the current period.
    pub fn set_duty_percent(&mut self, percent: f32) -> TimerSettings {
        let period = self.current.map_or(MAX_PERIOD, |s| s.period);
        let settings = TimerSettings {
            prescaler: self.clock.prescaler,
            period,
            compare: compare_for_duty(period, percent),
        };
        self.write(settings);
        settings
    }

    /// Switch the PWM output on. No-op when already on.
    pub fn enable(&mut self) {
        if !self.enabled {
            self.enabled = true;
            self.output.set_enabled(true);
        }
    }

    /// Switch the PWM output off. No-op when already off.
    pub fn disable(&mut self) {
        if self.enabled {
            self.enabled = false;
            self.output.set_enabled(false);
        }
    }

    #[cfg(test)]
    pub(crate) fn output_mut(&mut self) -> &mut T {
        &mut self.output
    }

    fn write(&mut self, settings: TimerSettings) {
        if self.current != Some(settings) {
            self.output.apply(&settings);
            self.current = Some(settings);
        }
    }
}
