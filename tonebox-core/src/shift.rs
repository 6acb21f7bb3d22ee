//! Octave shift mode, press-duration detection and the mode indicator LED.
//!
//! The shift button is sampled once per loop tick. [`PressTracker`] turns
//! the level stream into [`Press`] events, [`ShiftMode::apply`] steps the
//! mode, and [`ModeIndicator`] decides the indicator LED level from the
//! mode and a free-running millisecond tick.
//!
//! ```text
//! short press:  0 → -1 → -2 → 0
//! long press:   0 → +1 → +2 → 0
//! ```

/// Timing constants for the shift button and indicator LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShiftConfig {
    /// Presses at least this long count as long presses. Default: 300 ms.
    pub long_press_ms: u64,
    /// Settling wait after a release edge. Default: 10 ms.
    pub debounce_ms: u64,
    /// Indicator toggle interval at shift -1. Default: 400 ms.
    pub slow_blink_ms: u64,
    /// Indicator toggle interval at shift -2. Default: 200 ms.
    pub fast_blink_ms: u64,
}

impl Default for ShiftConfig {
    fn default() -> Self {
        Self {
            long_press_ms: 300,
            debounce_ms: 10,
            slow_blink_ms: 400,
            fast_blink_ms: 200,
        }
    }
}

/// Octave transposition, always within `[-2, 2]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShiftMode(i8);

impl ShiftMode {
    pub const MIN: i8 = -2;
    pub const MAX: i8 = 2;

    /// Build a mode, clamping `value` into `[-2, 2]`.
    pub const fn new(value: i8) -> Self {
        if value < Self::MIN {
            Self(Self::MIN)
        } else if value > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(value)
        }
    }

    pub const fn value(self) -> i8 {
        self.0
    }

    /// One step down; wraps past -2 back to 0.
    pub fn shift_down(&mut self) {
        self.0 -= 1;
        if self.0 < Self::MIN {
            self.0 = 0;
        }
    }

    /// One step up; wraps past +2 back to 0.
    pub fn shift_up(&mut self) {
        self.0 += 1;
        if self.0 > Self::MAX {
            self.0 = 0;
        }
    }

    /// Step the mode for a completed press.
    pub fn apply(&mut self, press: Press) {
        match press {
            Press::Short => self.shift_down(),
            Press::Long => self.shift_up(),
        }
    }

    /// Frequency multiplier: 0.25, 0.5, 1, 2 or 4.
    pub fn octave_multiplier(self) -> f32 {
        match self.0 {
            -2 => 0.25,
            -1 => 0.5,
            1 => 2.0,
            2 => 4.0,
            _ => 1.0,
        }
    }

    /// Indicator behaviour for this mode.
    pub fn indicator(self, config: &ShiftConfig) -> IndicatorPattern {
        match self.0 {
            0 => IndicatorPattern::Off,
            v if v > 0 => IndicatorPattern::Solid,
            -1 => IndicatorPattern::Blink(config.slow_blink_ms),
            _ => IndicatorPattern::Blink(config.fast_blink_ms),
        }
    }
}

// ── Press detection ─────────────────────────────────────────────────────

/// A completed button press, classified by how long it was held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Press {
    Short,
    Long,
}

/// Edge detector for an active-low button sampled once per tick.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PressTracker {
    was_pressed: bool,
    pressed_at_ms: u64,
    long_press_ms: u64,
}

impl PressTracker {
    pub fn new(config: &ShiftConfig) -> Self {
        Self {
            was_pressed: false,
            pressed_at_ms: 0,
            long_press_ms: config.long_press_ms,
        }
    }

    /// Feed the current button level. Returns a [`Press`] on the release
    /// edge; the caller should then wait the debounce interval.
    pub fn update(&mut self, pressed: bool, now_ms: u64) -> Option<Press> {
        let event = match (self.was_pressed, pressed) {
            (false, true) => {
                self.pressed_at_ms = now_ms;
                None
            }
            (true, false) => {
                let held = now_ms.wrapping_sub(self.pressed_at_ms);
                if held < self.long_press_ms {
                    Some(Press::Short)
                } else {
                    Some(Press::Long)
                }
            }
            _ => None,
        };
        self.was_pressed = pressed;
        event
    }
}

// ── Indicator LED ───────────────────────────────────────────────────────

/// What the mode indicator LED should be doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorPattern {
    Off,
    Solid,
    /// Toggle every `n` milliseconds.
    Blink(u64),
}

/// Blink state for the mode indicator LED.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeIndicator {
    last_toggle_ms: u64,
    blink_on: bool,
}

impl ModeIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// LED level (`true` = lit) for `pattern` at tick `now_ms`.
    pub fn update(&mut self, pattern: IndicatorPattern, now_ms: u64) -> bool {
        match pattern {
            IndicatorPattern::Off => false,
            IndicatorPattern::Solid => true,
            IndicatorPattern::Blink(interval) => {
                if now_ms.wrapping_sub(self.last_toggle_ms) >= interval {
                    self.last_toggle_ms = now_ms;
                    self.blink_on = !self.blink_on;
                }
                self.blink_on
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps() {
        assert_eq!(ShiftMode::new(-7).value(), -2);
        assert_eq!(ShiftMode::new(9).value(), 2);
        assert_eq!(ShiftMode::new(1).value(), 1);
    }

    #[test]
    fn short_presses_cycle_down_and_wrap() {
        let mut mode = ShiftMode::default();
        let mut seen = [0i8; 4];
        for slot in seen.iter_mut() {
            mode.apply(Press::Short);
            *slot = mode.value();
        }
        assert_eq!(seen, [-1, -2, 0, -1]);
    }

    #[test]
    fn long_presses_cycle_up_and_wrap() {
        let mut mode = ShiftMode::default();
        let mut seen = [0i8; 4];
        for slot in seen.iter_mut() {
            mode.apply(Press::Long);
            *slot = mode.value();
        }
        assert_eq!(seen, [1, 2, 0, 1]);
    }

    #[test]
    fn mixed_presses() {
        let mut mode = ShiftMode::new(-2);
        mode.apply(Press::Long);
        assert_eq!(mode.value(), -1);
        mode = ShiftMode::new(2);
        mode.apply(Press::Short);
        assert_eq!(mode.value(), 1);
    }

    #[test]
    fn multipliers() {
        let expected = [(-2, 0.25), (-1, 0.5), (0, 1.0), (1, 2.0), (2, 4.0)];
        for (v, m) in expected {
            assert_eq!(ShiftMode::new(v).octave_multiplier(), m);
        }
    }

    #[test]
    fn tracker_classifies_by_duration() {
        let config = ShiftConfig::default();
        let mut tracker = PressTracker::new(&config);

        assert_eq!(tracker.update(false, 0), None);
        assert_eq!(tracker.update(true, 100), None);
        assert_eq!(tracker.update(true, 200), None);
        assert_eq!(tracker.update(false, 399), Some(Press::Short));

        assert_eq!(tracker.update(true, 1000), None);
        assert_eq!(tracker.update(false, 1300), Some(Press::Long));
    }

    #[test]
    fn tracker_ignores_steady_levels() {
        let mut tracker = PressTracker::new(&ShiftConfig::default());
        for t in 0..10 {
            assert_eq!(tracker.update(false, t), None);
        }
        assert_eq!(tracker.update(true, 10), None);
        for t in 11..20 {
            assert_eq!(tracker.update(true, t), None);
        }
    }

    #[test]
    fn tracker_handles_tick_wrap() {
        let mut tracker = PressTracker::new(&ShiftConfig::default());
        tracker.update(true, u64::MAX - 50);
        assert_eq!(tracker.update(false, 49), Some(Press::Short));
    }

    #[test]
    fn indicator_pattern_per_mode() {
        let config = ShiftConfig::default();
        assert_eq!(ShiftMode::new(0).indicator(&config), IndicatorPattern::Off);
        assert_eq!(ShiftMode::new(1).indicator(&config), IndicatorPattern::Solid);
        assert_eq!(ShiftMode::new(2).indicator(&config), IndicatorPattern::Solid);
        assert_eq!(ShiftMode::new(-1).indicator(&config), IndicatorPattern::Blink(400));
        assert_eq!(ShiftMode::new(-2).indicator(&config), IndicatorPattern::Blink(200));
    }

    #[test]
    fn indicator_blinks_at_interval() {
        let mut ind = ModeIndicator::new();
        let pattern = IndicatorPattern::Blink(200);

        assert!(ind.update(pattern, 200));
        assert!(ind.update(pattern, 300));
        assert!(!ind.update(pattern, 400));
        assert!(!ind.update(pattern, 599));
        assert!(ind.update(pattern, 600));
    }

    #[test]
    fn indicator_steady_patterns() {
        let mut ind = ModeIndicator::new();
        assert!(!ind.update(IndicatorPattern::Off, 5));
        assert!(ind.update(IndicatorPattern::Solid, 6));
    }
}
