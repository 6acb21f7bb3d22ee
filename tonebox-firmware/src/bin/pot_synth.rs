//! pot-synth
//!
//! A potentiometer stands in for the timing resistor of a 555 astable; its
//! position sets the pitch. Alongside the synth loop run:
//!
//! - a UART task taking one-byte commands (`I` `O` `F` `H` `T`),
//! - two button tasks: B1 toggles the preset tune, B2 gates the PWM (also
//!   mid-note while the tune plays),
//! - an LED task that follows the command-selected [`LedMode`].
//!
//! State shared between tasks lives in the [`ControlFlags`] static.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_rp::adc::{self, Adc, Channel};
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::Pwm;
use embassy_rp::uart::{self, Async, Uart};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Delay, Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use tonebox::button::DebouncedButton;
use tonebox::command::{dispatch, Response};
use tonebox::flags::{ControlFlags, LedMode};
use tonebox::mapper::RcOscillatorConfig;
use tonebox::melody::{play_tune, PRESET_TUNE};
use tonebox::sampler::{Oversampler, SamplerConfig};
use tonebox::tone::ToneGenerator;
use tonebox_firmware::serial::{write_banner, write_help};
use tonebox_firmware::{AdcInput, PwmTone, LOOP_TICK_MS, TONE_TICK_HZ};

// ---------------------------------------------------------------------------
// Boot block and interrupt binding
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => adc::InterruptHandler;
    UART0_IRQ => uart::InterruptHandler<UART0>;
});

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Written by the UART and button tasks, read by the synth loop.
static FLAGS: ControlFlags = ControlFlags::new();

/// Wakes the LED task as soon as a command changes the LED mode.
static LED_MODE_CHANGED: Signal<CriticalSectionRawMutex, LedMode> = Signal::new();

/// Carries each B2 toggle so a playing tune can cut its note short.
static PWM_GATE: Signal<CriticalSectionRawMutex, bool> = Signal::new();

/// Half period of the flashing LED.
const FLASH_INTERVAL: Duration = Duration::from_millis(250);

/// Settling time after both the press and the release of B1/B2.
const BUTTON_DEBOUNCE_MS: u32 = 50;

const UART_BAUD: u32 = 115_200;

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// One-byte command loop. Always re-arms for the next byte, including
/// after receive errors.
#[embassy_executor::task]
async fn serial_task(mut uart: Uart<'static, Async>) {
    write_banner(&mut uart).await;

    let mut byte = [0u8; 1];
    loop {
        if let Err(e) = uart.read(&mut byte).await {
            warn!("UART receive error: {}", Debug2Format(&e));
            continue;
        }

        debug!("UART rx {=u8:#x}", byte[0]);

        match dispatch(byte[0], &FLAGS) {
            Response::Help => write_help(&mut uart).await,
            Response::LedChanged(mode) => {
                info!("LED mode → {}", mode);
                LED_MODE_CHANGED.signal(mode);
            }
            Response::None => {}
        }
    }
}

#[derive(Clone, Copy, Format)]
enum ButtonRole {
    /// B1: start or cancel the preset tune.
    Preset,
    /// B2: switch the PWM output on or off.
    PwmGate,
}

#[embassy_executor::task(pool_size = 2)]
async fn button_task(pin: Input<'static>, role: ButtonRole) {
    let mut button = DebouncedButton::new(pin, Delay, BUTTON_DEBOUNCE_MS);
    loop {
        if let Err(e) = button.wait_for_press().await {
            warn!("{} button wait failed: {}", role, e);
            continue;
        }

        match role {
            ButtonRole::Preset => {
                let on = FLAGS.toggle_play_preset();
                info!("B1: preset tune {}", if on { "requested" } else { "cancelled" });
            }
            ButtonRole::PwmGate => {
                let on = FLAGS.toggle_pwm_enabled();
                PWM_GATE.signal(on);
                info!("B2: PWM {}", if on { "enabled" } else { "disabled" });
            }
        }
    }
}

/// Resolves once B2 switches the PWM output off.
async fn pwm_gate_closed() {
    while PWM_GATE.wait().await {}
}

/// Drives the status LED from the current [`LedMode`]. A mode change
/// takes effect immediately; flashing toggles every [`FLASH_INTERVAL`].
#[embassy_executor::task]
async fn led_task(mut led: Output<'static>) {
    let mut phase = true;
    loop {
        let mode = FLAGS.led_mode();
        led.set_level(Level::from(mode.level(phase)));

        match select(Timer::after(FLASH_INTERVAL), LED_MODE_CHANGED.wait()).await {
            Either::First(()) => phase = !phase,
            Either::Second(_) => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("pot-synth starting");

    // —— Pin assignments ————————————————————————————————————————————————————
    // UART0 TX  → GP0,  RX → GP1   115200 8N1
    // POT       → GP26 (ADC0)
    // B1        → GP16  pull-up, active-low
    // B2        → GP17  pull-up, active-low
    // LED       → GP25  (onboard)
    // SPEAKER   → GP14 / GP15 (PWM slice 7 A / B)
    // ———————————————————————————————————————————————————————————————————————

    // LED cold-starts on until the LED task takes over.
    let led = Output::new(p.PIN_25, Level::High);

    let mut uart_config = uart::Config::default();
    uart_config.baudrate = UART_BAUD;
    let uart = Uart::new(
        p.UART0,
        p.PIN_0, // TX
        p.PIN_1, // RX
        Irqs,
        p.DMA_CH0,
        p.DMA_CH1,
        uart_config,
    );

    let sampler_config = SamplerConfig::default();
    if let Err(e) = sampler_config.validate() {
        error!("Invalid sampler config: {}", e);
    }
    let adc = Adc::new(p.ADC, Irqs, adc::Config::default());
    let pot = Channel::new_pin(p.PIN_26, Pull::None);
    let mut pot_input = AdcInput::new(adc, pot, &sampler_config);
    let mut sampler = Oversampler::new(&sampler_config);

    let b1 = Input::new(p.PIN_16, Pull::Up);
    let b2 = Input::new(p.PIN_17, Pull::Up);

    let pwm = Pwm::new_output_ab(p.PWM_SLICE7, p.PIN_14, p.PIN_15, PwmTone::idle_config());
    let mut tone = ToneGenerator::new(PwmTone::new(pwm), PwmTone::timer_clock(TONE_TICK_HZ));
    tone.set_duty_percent(50.0);
    tone.enable();

    let rc = RcOscillatorConfig::default();
    if let Err(e) = rc.validate() {
        error!("Invalid RC oscillator config: {}", e);
    }

    // —— Spawn tasks ————————————————————————————————————————————————————————

    spawner.spawn(unwrap!(serial_task(uart)));
    spawner.spawn(unwrap!(button_task(b1, ButtonRole::Preset)));
    spawner.spawn(unwrap!(button_task(b2, ButtonRole::PwmGate)));
    spawner.spawn(unwrap!(led_task(led)));

    info!("All tasks spawned");

    // —— Synth loop ————————————————————————————————————————————————————————

    let mut delay = Delay;
    loop {
        if !FLAGS.pwm_enabled() {
            tone.disable();
            Timer::after(Duration::from_millis(LOOP_TICK_MS)).await;
            continue;
        }

        if FLAGS.play_preset() {
            info!("Playing preset tune");
            // Drop toggles from before the tune; the flag check covers them.
            PWM_GATE.reset();
            let outcome = play_tune(&PRESET_TUNE, &mut tone, &mut delay, &FLAGS, pwm_gate_closed).await;
            info!("Preset tune: {}", outcome);
            continue;
        }

        let raw = sampler.sample(&mut pot_input).await;
        tone.play(rc.frequency_for(raw));
        tone.enable();

        Timer::after(Duration::from_millis(LOOP_TICK_MS)).await;
    }
}
