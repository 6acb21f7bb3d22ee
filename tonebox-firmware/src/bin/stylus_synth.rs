//! stylus-synth
//!
//! Stylus-on-resistive-strip instrument. The strip forms a voltage
//! divider read on ADC1; pitch follows the reading linearly between
//! [`LinearConfig::min_hz`] and [`LinearConfig::max_hz`]. Lifting the
//! stylus lets the pull-down take the input near zero, which silences the
//! tone and turns the activity LED off.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc, Channel};
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Level, Output, Pull};
use embassy_rp::pwm::Pwm;
use embassy_time::{Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use tonebox::mapper::LinearConfig;
use tonebox::sampler::{Oversampler, SamplerConfig};
use tonebox::tone::ToneGenerator;
use tonebox_firmware::{AdcInput, PwmTone, LOOP_TICK_MS, TONE_TICK_HZ};

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => adc::InterruptHandler;
});

/// Stylus settings on top of the linear pitch map.
struct StylusConfig {
    /// Pitch range. Default: [`LinearConfig::default()`].
    pitch: LinearConfig,
    /// Averaged readings below this mean the stylus is lifted. Default: 32.
    contact_threshold: u16,
}

impl Default for StylusConfig {
    fn default() -> Self {
        Self {
            pitch: LinearConfig::default(),
            contact_threshold: 32,
        }
    }
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("stylus-synth starting");

    // —— Pin assignments ————————————————————————————————————————————————————
    // STRIP     → GP27 (ADC1), 100 kΩ pull-down to GND
    // LED       → GP25 (onboard)
    // SPEAKER   → GP14 / GP15 (PWM slice 7 A / B)
    // ———————————————————————————————————————————————————————————————————————

    let config = StylusConfig::default();
    if let Err(e) = config.pitch.validate() {
        error!("Invalid stylus pitch range: {}", e);
    }

    let sampler_config = SamplerConfig::default();
    if let Err(e) = sampler_config.validate() {
        error!("Invalid sampler config: {}", e);
    }
    let adc = Adc::new(p.ADC, Irqs, adc::Config::default());
    let strip = Channel::new_pin(p.PIN_27, Pull::None);
    let mut strip_input = AdcInput::new(adc, strip, &sampler_config);
    let mut sampler = Oversampler::new(&sampler_config);

    let mut led = Output::new(p.PIN_25, Level::Low);

    let pwm = Pwm::new_output_ab(p.PWM_SLICE7, p.PIN_14, p.PIN_15, PwmTone::idle_config());
    let mut tone = ToneGenerator::new(PwmTone::new(pwm), PwmTone::timer_clock(TONE_TICK_HZ));
    tone.silence();
    tone.enable();

    let mut touching = false;

    loop {
        let raw = sampler.sample(&mut strip_input).await;
        let contact = raw >= config.contact_threshold;

        if contact {
            let freq = config.pitch.frequency_for(raw);
            tone.play(freq);
            if !touching {
                debug!("Stylus down at raw {} → {} Hz", raw, freq);
            }
        } else {
            tone.silence();
            if touching {
                debug!("Stylus lifted");
            }
        }

        touching = contact;
        led.set_level(Level::from(contact));

        Timer::after(Duration::from_millis(LOOP_TICK_MS)).await;
    }
}
