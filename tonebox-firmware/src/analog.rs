//! [`AnalogSource`] backed by the RP2350 ADC with a per-read timeout.

use embassy_rp::adc::{self, Adc, Channel};
use embassy_time::{with_timeout, Duration};
use tonebox::sampler::{AnalogSource, SamplerConfig};

/// One ADC channel plus the converter that reads it.
pub struct AdcInput<'d> {
    adc: Adc<'d, adc::Async>,
    channel: Channel<'d>,
    timeout: Duration,
}

impl<'d> AdcInput<'d> {
    pub fn new(adc: Adc<'d, adc::Async>, channel: Channel<'d>, config: &SamplerConfig) -> Self {
        Self {
            adc,
            channel,
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

impl AnalogSource for AdcInput<'_> {
    async fn read_raw(&mut self) -> Option<u16> {
        match with_timeout(self.timeout, self.adc.read(&mut self.channel)).await {
            Ok(Ok(raw)) => Some(raw),
            Ok(Err(e)) => {
                defmt::warn!("ADC conversion failed: {}", defmt::Debug2Format(&e));
                None
            }
            Err(_) => {
                defmt::warn!("ADC conversion timed out");
                None
            }
        }
    }
}
