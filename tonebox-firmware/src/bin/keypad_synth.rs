//! keypad-synth
//!
//! 25-key chromatic keyboard (C3..C5) with a two-octave shift in either
//! direction. Runs a single polling loop:
//!
//! 1. Sample the shift button; on release step the [`ShiftMode`] (short
//!    press down, long press up) and wait out the bounce.
//! 2. Update the mode LED: off at 0, solid when shifted up, slow/fast
//!    blink when shifted down one/two octaves.
//! 3. Scan the key matrix. The first pressed key sounds and lights the
//!    onboard LED; no key silences the tone.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::pwm::Pwm;
use embassy_time::{Delay, Duration, Instant, Timer};
use {defmt_rtt as _, panic_probe as _};

use tonebox::keypad::KeyMatrix;
use tonebox::mapper::{key_frequency, KEY_COLS, KEY_ROWS};
use tonebox::shift::{ModeIndicator, PressTracker, ShiftConfig, ShiftMode};
use tonebox::tone::ToneGenerator;
use tonebox_firmware::{PwmTone, LOOP_TICK_MS, TONE_TICK_HZ};

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

/// Row settle time before the columns are read.
const MATRIX_SETTLE_US: u32 = 5;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("keypad-synth starting");

    // —— Pin assignments ————————————————————————————————————————————————————
    // ROW 0..4  → GP0..GP4    push-pull, idle high
    // COL 0..4  → GP5..GP9    pull-up, active-low
    // SHIFT     → GP10        pull-up, active-low
    // MODE LED  → GP11
    // KEY LED   → GP25        (onboard)
    // SPEAKER   → GP14 / GP15 (PWM slice 7 A / B)
    // ———————————————————————————————————————————————————————————————————————

    let rows: [Output<'static>; KEY_ROWS] = [
        Output::new(p.PIN_0, Level::High),
        Output::new(p.PIN_1, Level::High),
        Output::new(p.PIN_2, Level::High),
        Output::new(p.PIN_3, Level::High),
        Output::new(p.PIN_4, Level::High),
    ];
    let cols: [Input<'static>; KEY_COLS] = [
        Input::new(p.PIN_5, Pull::Up),
        Input::new(p.PIN_6, Pull::Up),
        Input::new(p.PIN_7, Pull::Up),
        Input::new(p.PIN_8, Pull::Up),
        Input::new(p.PIN_9, Pull::Up),
    ];
    let mut matrix = unwrap!(KeyMatrix::new(rows, cols, MATRIX_SETTLE_US));

    let shift_button = Input::new(p.PIN_10, Pull::Up);
    let mut mode_led = Output::new(p.PIN_11, Level::Low);
    let mut key_led = Output::new(p.PIN_25, Level::Low);

    let pwm = Pwm::new_output_ab(p.PWM_SLICE7, p.PIN_14, p.PIN_15, PwmTone::idle_config());
    let mut tone = ToneGenerator::new(PwmTone::new(pwm), PwmTone::timer_clock(TONE_TICK_HZ));
    tone.silence();
    tone.enable();

    let shift_config = ShiftConfig::default();
    let mut shift = ShiftMode::default();
    let mut tracker = PressTracker::new(&shift_config);
    let mut indicator = ModeIndicator::new();
    let mut delay = Delay;
    let mut sounding: Option<usize> = None;

    info!("Ready, {} keys", KEY_ROWS * KEY_COLS);

    loop {
        let now = Instant::now().as_millis();

        // —— Shift button ————————————————————————————————————————————————————
        if let Some(press) = tracker.update(shift_button.is_low(), now) {
            shift.apply(press);
            info!("{} press, shift now {}", press, shift.value());
            Timer::after(Duration::from_millis(shift_config.debounce_ms)).await;
        }

        // —— Mode indicator ——————————————————————————————————————————————————
        let lit = indicator.update(shift.indicator(&shift_config), now);
        mode_led.set_level(Level::from(lit));

        // —— Key scan ————————————————————————————————————————————————————————
        let key = match matrix.scan(&mut delay) {
            Ok(key) => key,
            Err(e) => {
                warn!("Key scan failed: {}", e);
                None
            }
        };

        match key.and_then(|i| key_frequency(i, shift).map(|f| (i, f))) {
            Some((index, freq)) => {
                tone.play(freq);
                key_led.set_high();
                if sounding != Some(index) {
                    debug!("key {} → {} Hz", index, freq);
                }
                sounding = Some(index);
            }
            None => {
                tone.silence();
                key_led.set_low();
                sounding = None;
            }
        }

        Timer::after(Duration::from_millis(LOOP_TICK_MS)).await;
    }
}
