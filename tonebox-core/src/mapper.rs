//! Raw input → tone frequency mapping.
//!
//! Three policies are provided, one per instrument variant:
//!
//! - [`LinearConfig`]: stylus strip, frequency proportional to the ADC
//!   reading.
//! - [`RcOscillatorConfig`]: potentiometer standing in for the timing
//!   resistor of a 555 astable, `f = 1.44 / ((R1 + 2·R2)·C)`.
//! - [`key_frequency`]: direct lookup in [`KEY_TABLE`], scaled by the
//!   current [`ShiftMode`].
//!
//! All mappers are pure functions of the latest sample and always return a
//! positive, finite frequency for a validated configuration.

use crate::error::ConfigError;
use crate::shift::ShiftMode;

/// Largest value produced by the 12-bit ADC.
pub const ADC_FULL_SCALE: u16 = 4095;

// ── Linear (stylus) ─────────────────────────────────────────────────────

/// Linear ADC → frequency transfer function.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinearConfig {
    /// Frequency at raw = 0, in Hz. Default: 110.
    pub min_hz: f32,
    /// Frequency at raw = `full_scale`, in Hz. Default: 1760.
    pub max_hz: f32,
    /// Raw value that maps to `max_hz`. Default: 4095.
    pub full_scale: u16,
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            min_hz: 110.0,
            max_hz: 1760.0,
            full_scale: ADC_FULL_SCALE,
        }
    }
}

impl LinearConfig {
    /// Check that the range is non-empty and the bounds are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_hz.is_finite() && self.max_hz.is_finite()) || self.min_hz <= 0.0 {
            return Err(ConfigError::InvalidFrequency);
        }
        if self.min_hz >= self.max_hz {
            return Err(ConfigError::EmptyFrequencyRange);
        }
        if self.full_scale == 0 {
            return Err(ConfigError::ZeroFullScale);
        }
        Ok(())
    }

    /// Map a raw sample to a frequency in `[min_hz, max_hz]`.
    ///
    /// ```
    /// use tonebox::mapper::LinearConfig;
    ///
    /// let lin = LinearConfig::default();
    /// assert_eq!(lin.frequency_for(0), 110.0);
    /// assert_eq!(lin.frequency_for(4095), 1760.0);
    /// ```
    pub fn frequency_for(&self, raw: u16) -> f32 {
        let span = self.max_hz - self.min_hz;
        let f = self.min_hz + raw as f32 * span / self.full_scale as f32;
        f.max(self.min_hz).min(self.max_hz)
    }
}

// ── RC oscillator (potentiometer) ───────────────────────────────────────

/// 555-style astable approximation driven by a potentiometer voltage.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RcOscillatorConfig {
    /// Fixed resistor R1 in ohms. Default: 22 500.
    pub r_fixed_ohms: f32,
    /// Smallest usable pot resistance in ohms. Default: 100.
    pub rb_min_ohms: f32,
    /// Pot resistance at full travel in ohms. Default: 250 000.
    pub rb_max_ohms: f32,
    /// Timing capacitor in farads. Default: 0.1 µF.
    pub capacitance_farads: f32,
    /// ADC reference voltage. Default: 3.3 V.
    pub vref: f32,
    /// Raw value corresponding to `vref`. Default: 4095.
    pub full_scale: u16,
}

impl Default for RcOscillatorConfig {
    fn default() -> Self {
        Self {
            r_fixed_ohms: 22_500.0,
            rb_min_ohms: 100.0,
            rb_max_ohms: 250_000.0,
            capacitance_farads: 0.1e-6,
            vref: 3.3,
            full_scale: ADC_FULL_SCALE,
        }
    }
}

/// Frequency constant of the 555 astable equation (≈ 2·ln 2 inverted).
const ASTABLE_K: f32 = 1.44;

impl RcOscillatorConfig {
    /// Check that every component value is physical.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let components = [
            self.r_fixed_ohms,
            self.rb_min_ohms,
            self.rb_max_ohms,
            self.capacitance_farads,
            self.vref,
        ];
        if components.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(ConfigError::InvalidComponent);
        }
        if self.rb_min_ohms > self.rb_max_ohms {
            return Err(ConfigError::EmptyResistanceRange);
        }
        if self.full_scale == 0 {
            return Err(ConfigError::ZeroFullScale);
        }
        Ok(())
    }

    /// Voltage seen at the ADC pin for a raw sample.
    pub fn voltage_for(&self, raw: u16) -> f32 {
        raw as f32 * (self.vref / self.full_scale as f32)
    }

    /// Pot resistance derived from the voltage ratio, clamped to
    /// `[rb_min_ohms, rb_max_ohms]`.
    pub fn resistance_for(&self, raw: u16) -> f32 {
        let ratio = self.voltage_for(raw) / self.vref;
        (ratio * self.rb_max_ohms)
            .max(self.rb_min_ohms)
            .min(self.rb_max_ohms)
    }

    /// Oscillation frequency for a raw sample.
    pub fn frequency_for(&self, raw: u16) -> f32 {
        let rb = self.resistance_for(raw);
        ASTABLE_K / ((self.r_fixed_ohms + 2.0 * rb) * self.capacitance_farads)
    }
}

// ── Key table (keypad) ──────────────────────────────────────────────────

/// Position of a key in the scan matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyId {
    pub row: u8,
    pub col: u8,
}

/// Matrix rows.
pub const KEY_ROWS: usize = 5;
/// Matrix columns.
pub const KEY_COLS: usize = 5;
/// Number of playable keys.
pub const NUM_KEYS: usize = KEY_ROWS * KEY_COLS;

const fn key(index: usize, freq: f32) -> (KeyId, f32) {
    (
        KeyId {
            row: (index / KEY_COLS) as u8,
            col: (index % KEY_COLS) as u8,
        },
        freq,
    )
}

/// Chromatic C3..C5, one entry per key in row-major scan order.
pub const KEY_TABLE: [(KeyId, f32); NUM_KEYS] = [
    key(0, 130.81),
    key(1, 138.59),
    key(2, 146.83),
    key(3, 155.56),
    key(4, 164.81),
    key(5, 174.61),
    key(6, 185.00),
    key(7, 196.00),
    key(8, 207.65),
    key(9, 220.00),
    key(10, 233.08),
    key(11, 246.94),
    key(12, 261.63),
    key(13, 277.18),
    key(14, 293.66),
    key(15, 311.13),
    key(16, 329.63),
    key(17, 349.23),
    key(18, 369.99),
    key(19, 392.00),
    key(20, 415.30),
    key(21, 440.00),
    key(22, 466.16),
    key(23, 493.88),
    key(24, 523.25),
];

/// Frequency for key `index` transposed by `shift`, or `None` for an
/// index outside the table.
pub fn key_frequency(index: usize, shift: ShiftMode) -> Option<f32> {
    KEY_TABLE
        .get(index)
        .map(|(_, freq)| freq * shift.octave_multiplier())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_output_stays_in_range_for_every_raw_value() {
        let lin = LinearConfig::default();
        for raw in 0..=ADC_FULL_SCALE {
            let f = lin.frequency_for(raw);
            assert!(f >= lin.min_hz && f <= lin.max_hz, "raw {} gave {}", raw, f);
        }
    }

    #[test]
    fn linear_clamps_values_beyond_full_scale() {
        let lin = LinearConfig::default();
        assert_eq!(lin.frequency_for(u16::MAX), lin.max_hz);
    }

    #[test]
    fn linear_midpoint() {
        let lin = LinearConfig {
            min_hz: 100.0,
            max_hz: 300.0,
            full_scale: 100,
        };
        assert_eq!(lin.frequency_for(50), 200.0);
    }

    #[test]
    fn linear_validate_rejects_bad_ranges() {
        let mut lin = LinearConfig::default();
        assert_eq!(lin.validate(), Ok(()));

        lin.max_hz = lin.min_hz;
        assert_eq!(lin.validate(), Err(ConfigError::EmptyFrequencyRange));

        lin = LinearConfig { min_hz: 0.0, ..Default::default() };
        assert_eq!(lin.validate(), Err(ConfigError::InvalidFrequency));

        lin = LinearConfig { max_hz: f32::NAN, ..Default::default() };
        assert_eq!(lin.validate(), Err(ConfigError::InvalidFrequency));

        lin = LinearConfig { full_scale: 0, ..Default::default() };
        assert_eq!(lin.validate(), Err(ConfigError::ZeroFullScale));
    }

    #[test]
    fn rc_resistance_stays_in_bounds() {
        let rc = RcOscillatorConfig::default();
        for raw in (0..=u16::MAX).step_by(7) {
            let r = rc.resistance_for(raw);
            assert!(r >= 100.0 && r <= rc.rb_max_ohms, "raw {} gave {}", raw, r);
        }
    }

    #[test]
    fn rc_frequency_positive_and_finite() {
        let rc = RcOscillatorConfig::default();
        for raw in 0..=ADC_FULL_SCALE {
            let f = rc.frequency_for(raw);
            assert!(f.is_finite() && f > 0.0, "raw {} gave {}", raw, f);
        }
    }

    #[test]
    fn rc_endpoints_match_astable_equation() {
        let rc = RcOscillatorConfig::default();

        // Pot at zero clamps to 100 Ω: 1.44 / (22 700 Ω · 0.1 µF) ≈ 634 Hz.
        let high = rc.frequency_for(0);
        assert!((high - 634.36).abs() < 0.5, "got {}", high);

        // Full travel: 1.44 / (522 500 Ω · 0.1 µF) ≈ 27.6 Hz.
        let low = rc.frequency_for(ADC_FULL_SCALE);
        assert!((low - 27.56).abs() < 0.1, "got {}", low);
    }

    #[test]
    fn rc_frequency_falls_as_pot_turns() {
        let rc = RcOscillatorConfig::default();
        let mut prev = rc.frequency_for(0);
        for raw in (64..=ADC_FULL_SCALE).step_by(64) {
            let f = rc.frequency_for(raw);
            assert!(f <= prev);
            prev = f;
        }
    }

    #[test]
    fn rc_validate() {
        assert_eq!(RcOscillatorConfig::default().validate(), Ok(()));

        let bad = RcOscillatorConfig { capacitance_farads: 0.0, ..Default::default() };
        assert_eq!(bad.validate(), Err(ConfigError::InvalidComponent));

        let bad = RcOscillatorConfig { rb_min_ohms: 300_000.0, ..Default::default() };
        assert_eq!(bad.validate(), Err(ConfigError::EmptyResistanceRange));
    }

    #[test]
    fn key_table_is_row_major() {
        for (i, (id, _)) in KEY_TABLE.iter().enumerate() {
            assert_eq!(id.row as usize, i / KEY_COLS);
            assert_eq!(id.col as usize, i % KEY_COLS);
        }
    }

    #[test]
    fn key_table_ascends() {
        for pair in KEY_TABLE.windows(2) {
            assert!(pair[0].1 < pair[1].1);
        }
    }

    #[test]
    fn key_frequency_applies_octave_shift() {
        assert_eq!(key_frequency(21, ShiftMode::default()), Some(440.0));
        assert_eq!(key_frequency(21, ShiftMode::new(1)), Some(880.0));
        assert_eq!(key_frequency(21, ShiftMode::new(2)), Some(1760.0));
        assert_eq!(key_frequency(21, ShiftMode::new(-1)), Some(220.0));
        assert_eq!(key_frequency(21, ShiftMode::new(-2)), Some(110.0));
    }

    #[test]
    fn key_frequency_out_of_range() {
        assert_eq!(key_frequency(NUM_KEYS, ShiftMode::default()), None);
    }
}
