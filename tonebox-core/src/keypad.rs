//! Key scanning for active-low keypads.
//!
//! Columns are pull-up inputs. A matrix scan drives one row low at a
//! time and reports the first column reading low; keys are numbered in
//! row-major order so the index lines up with
//! [`KEY_TABLE`](crate::mapper::KEY_TABLE).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::KeypadError;

/// Row-driven key matrix.
pub struct KeyMatrix<R, C, const ROWS: usize, const COLS: usize> {
    rows: [R; ROWS],
    cols: [C; COLS],
    settle_us: u32,
}

impl<R, C, const ROWS: usize, const COLS: usize> KeyMatrix<R, C, ROWS, COLS>
where
    R: OutputPin,
    C: InputPin,
{
    /// Take ownership of the pins and park every row high.
    ///
    /// `settle_us` is waited after each row is driven low, before the
    /// columns are read.
    pub fn new(rows: [R; ROWS], cols: [C; COLS], settle_us: u32) -> Result<Self, KeypadError> {
        let mut matrix = Self { rows, cols, settle_us };
        for row in matrix.rows.iter_mut() {
            row.set_high().map_err(|_| KeypadError::Row)?;
        }
        Ok(matrix)
    }

    /// Index of the first pressed key, if any.
    pub fn scan<D: DelayNs>(&mut self, delay: &mut D) -> Result<Option<usize>, KeypadError> {
        for r in 0..ROWS {
            self.rows[r].set_low().map_err(|_| KeypadError::Row)?;
            delay.delay_us(self.settle_us);

            let hit = first_low(&mut self.cols);

            self.rows[r].set_high().map_err(|_| KeypadError::Row)?;

            if let Some(c) = hit? {
                return Ok(Some(r * COLS + c));
            }
        }
        Ok(None)
    }
}

/// Index of the first pressed key among directly wired pins.
pub fn scan_direct<C: InputPin>(pins: &mut [C]) -> Result<Option<usize>, KeypadError> {
    first_low(pins)
}

fn first_low<C: InputPin>(pins: &mut [C]) -> Result<Option<usize>, KeypadError> {
    for (i, pin) in pins.iter_mut().enumerate() {
        if pin.is_low().map_err(|_| KeypadError::Column)? {
            return Ok(Some(i));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    struct Row<'a> {
        idx: usize,
        active: &'a Cell<Option<usize>>,
    }

    impl ErrorType for Row<'_> {
        type Error = Infallible;
    }

    impl OutputPin for Row<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.active.set(Some(self.idx));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            if self.active.get() == Some(self.idx) {
                self.active.set(None);
            }
            Ok(())
        }
    }

    struct Col<'a> {
        idx: usize,
        active: &'a Cell<Option<usize>>,
        pressed: &'a [(usize, usize)],
    }

    impl ErrorType for Col<'_> {
        type Error = Infallible;
    }

    impl InputPin for Col<'_> {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            self.is_low().map(|low| !low)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(match self.active.get() {
                Some(r) => self.pressed.contains(&(r, self.idx)),
                None => false,
            })
        }
    }

    fn matrix<'a>(
        active: &'a Cell<Option<usize>>,
        pressed: &'a [(usize, usize)],
    ) -> KeyMatrix<Row<'a>, Col<'a>, 5, 5> {
        let rows = core::array::from_fn(|idx| Row { idx, active });
        let cols = core::array::from_fn(|idx| Col { idx, active, pressed });
        KeyMatrix::new(rows, cols, 5).unwrap()
    }

    #[test]
    fn no_keys_pressed() {
        let active = Cell::new(None);
        let mut m = matrix(&active, &[]);
        assert_eq!(m.scan(&mut NoDelay), Ok(None));
        assert_eq!(active.get(), None);
    }

    #[test]
    fn single_key_maps_row_major() {
        let active = Cell::new(None);
        let mut m = matrix(&active, &[(4, 1)]);
        assert_eq!(m.scan(&mut NoDelay), Ok(Some(21)));
    }

    #[test]
    fn lowest_index_wins() {
        let active = Cell::new(None);
        let pressed = [(3, 4), (1, 2), (1, 0)];
        let mut m = matrix(&active, &pressed);
        assert_eq!(m.scan(&mut NoDelay), Ok(Some(5)));
    }

    #[test]
    fn rows_released_after_hit() {
        let active = Cell::new(None);
        let mut m = matrix(&active, &[(0, 0)]);
        assert_eq!(m.scan(&mut NoDelay), Ok(Some(0)));
        assert_eq!(active.get(), None);
    }

    struct Level(bool);

    impl ErrorType for Level {
        type Error = Infallible;
    }

    impl InputPin for Level {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.0)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.0)
        }
    }

    #[test]
    fn direct_scan_reports_first_low_pin() {
        let mut pins = [Level(true), Level(true), Level(false), Level(false)];
        assert_eq!(scan_direct(&mut pins), Ok(Some(2)));

        let mut idle = [Level(true), Level(true)];
        assert_eq!(scan_direct(&mut idle), Ok(None));
    }
}
