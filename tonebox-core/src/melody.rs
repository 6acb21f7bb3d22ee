//! Preset tune storage and interruptible playback.

use core::future::Future;

use embassy_futures::select::{select, Either};
use embedded_hal_async::delay::DelayNs;

use crate::flags::ControlFlags;
use crate::tone::{ToneGenerator, ToneOutput};

/// One step of a tune. A frequency of zero is a rest.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Note {
    pub freq_hz: f32,
    pub duration_ms: u32,
}

impl Note {
    pub const fn new(freq_hz: f32, duration_ms: u32) -> Self {
        Self { freq_hz, duration_ms }
    }

    pub fn is_rest(&self) -> bool {
        self.freq_hz <= 0.0
    }
}

/// Built-in tune played on `T` or button B1. Ends with a half-second rest.
pub static PRESET_TUNE: [Note; 26] = [
    Note::new(164.81, 410),
    Note::new(311.13, 375),
    Note::new(466.16, 125),
    Note::new(164.81, 203),
    Note::new(493.88, 277),
    Note::new(622.25, 222),
    Note::new(932.33, 256),
    Note::new(185.00, 225),
    Note::new(233.08, 256),
    Note::new(311.13, 223),
    Note::new(349.23, 254),
    Note::new(466.16, 229),
    Note::new(523.25, 255),
    Note::new(622.25, 225),
    Note::new(415.30, 252),
    Note::new(370.00, 224),
    Note::new(311.13, 202),
    Note::new(233.08, 264),
    Note::new(185.00, 236),
    Note::new(155.56, 233),
    Note::new(146.83, 271),
    Note::new(155.56, 255),
    Note::new(185.00, 224),
    Note::new(233.08, 225),
    Note::new(311.13, 256),
    Note::new(0.0, 500),
];

/// How a call to [`play_tune`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Playback {
    /// Every note was played.
    Completed,
    /// Stopped before note `next` because a flag was cleared.
    Stopped { next: usize },
    /// The gate closed while `note` was sounding; the output was switched
    /// off without waiting for the note to end.
    Interrupted { note: usize },
}

/// Play `tune` note by note.
///
/// Before each note the `play_preset` and `pwm_enabled` flags are checked;
/// if either is cleared playback stops. Rests disable the PWM output,
/// notes re-enable it. `play_preset` is cleared when this returns.
///
/// Each note's delay races a fresh future from `gate_closed`. If that
/// future resolves first the output is disabled on the spot and playback
/// ends with [`Playback::Interrupted`]. Pass
/// `|| core::future::pending()` for a tune that only stops between notes.
pub async fn play_tune<T, D, G, F>(
    tune: &[Note],
    generator: &mut ToneGenerator<T>,
    delay: &mut D,
    flags: &ControlFlags,
    mut gate_closed: G,
) -> Playback
where
    T: ToneOutput,
    D: DelayNs,
    G: FnMut() -> F,
    F: Future<Output = ()>,
{
    let mut outcome = Playback::Completed;

    for (i, note) in tune.iter().enumerate() {
        if !flags.keep_playing() {
            outcome = Playback::Stopped { next: i };
            break;
        }

        if note.is_rest() {
            generator.disable();
        } else {
            generator.play(note.freq_hz);
            generator.enable();
        }

        if let Either::Second(()) = select(delay.delay_ms(note.duration_ms), gate_closed()).await {
            generator.disable();
            outcome = Playback::Interrupted { note: i };
            break;
        }
    }

    flags.set_play_preset(false);

    #[cfg(feature = "defmt")]
    defmt::debug!("tune finished: {}", outcome);

    outcome
}
