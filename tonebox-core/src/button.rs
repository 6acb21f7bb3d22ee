//! Debounced active-low push buttons.
//!
//! A contact bounces both when it closes and when it opens. Waiting a fixed
//! time after the press edge only covers the first; a press held longer
//! than that wait still bounces on release and produces fresh falling
//! edges. [`DebouncedButton`] settles the press, waits for the release,
//! settles that too, and only then arms for the next falling edge.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;

/// Active-low button with edge-triggered, debounced press detection.
pub struct DebouncedButton<B, D> {
    pin: B,
    delay: D,
    debounce_ms: u32,
    idle: bool,
}

impl<B: Wait, D: DelayNs> DebouncedButton<B, D> {
    /// Wrap `pin`. The first call to [`wait_for_press`](Self::wait_for_press)
    /// fires on the first falling edge.
    pub fn new(pin: B, delay: D, debounce_ms: u32) -> Self {
        Self {
            pin,
            delay,
            debounce_ms,
            idle: true,
        }
    }

    /// Resolve on the falling edge of the next press.
    ///
    /// Returns right at the edge so the caller can act without delay; the
    /// bounce of that press and of its release is absorbed at the start of
    /// the following call.
    pub async fn wait_for_press(&mut self) -> Result<(), B::Error> {
        if !self.idle {
            self.delay.delay_ms(self.debounce_ms).await;
            self.pin.wait_for_high().await?;
            self.delay.delay_ms(self.debounce_ms).await;
        }
        // The next call settles whatever this wait catches.
        self.idle = false;
        self.pin.wait_for_falling_edge().await?;
        Ok(())
    }
}
