//! Oversampled analog input with stale-value fallback.

use crate::error::ConfigError;

/// One analog channel that can be read asynchronously.
///
/// `None` means the conversion failed or timed out.
#[allow(async_fn_in_trait)]
pub trait AnalogSource {
    async fn read_raw(&mut self) -> Option<u16>;
}

/// Averaging parameters for [`Oversampler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SamplerConfig {
    /// Conversions averaged per sample. Default: 4.
    pub oversample: u8,
    /// Per-conversion timeout in milliseconds. Default: 10.
    pub timeout_ms: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            oversample: 4,
            timeout_ms: 10,
        }
    }
}

impl SamplerConfig {
    /// Reject an oversample count of zero. [`Oversampler::new`] would read
    /// once per sample instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.oversample == 0 {
            return Err(ConfigError::ZeroOversample);
        }
        Ok(())
    }
}

/// Averages several conversions into one sample.
///
/// Failed conversions are left out of the average. If every conversion
/// fails the previous sample is returned again.
pub struct Oversampler {
    oversample: u8,
    last: u16,
}

impl Oversampler {
    /// Sampler reading `config.oversample` conversions per sample, at
    /// least one.
    pub fn new(config: &SamplerConfig) -> Self {
        Self {
            oversample: config.oversample.max(1),
            last: 0,
        }
    }

    /// Most recent sample.
    pub fn last(&self) -> u16 {
        self.last
    }

    /// Read `oversample` conversions from `source` and return their
    /// rounded mean.
    pub async fn sample<S: AnalogSource>(&mut self, source: &mut S) -> u16 {
        let mut sum: u32 = 0;
        let mut good: u32 = 0;

        for _ in 0..self.oversample {
            if let Some(raw) = source.read_raw().await {
                sum += raw as u32;
                good += 1;
            }
        }

        if good == 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("all ADC conversions failed; reusing {}", self.last);
            return self.last;
        }

        self.last = ((sum + good / 2) / good) as u16;
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    /// Replays a fixed script of conversion results, then fails.
    struct Script<'a> {
        results: &'a [Option<u16>],
        pos: usize,
    }

    impl<'a> Script<'a> {
        fn new(results: &'a [Option<u16>]) -> Self {
            Self { results, pos: 0 }
        }
    }

    impl AnalogSource for Script<'_> {
        async fn read_raw(&mut self) -> Option<u16> {
            let r = self.results.get(self.pos).copied().flatten();
            self.pos += 1;
            r
        }
    }

    #[test]
    fn averages_with_rounding() {
        let mut s = Oversampler::new(&SamplerConfig::default());
        let mut src = Script::new(&[Some(100), Some(101), Some(101), Some(101)]);
        // (403 + 2) / 4 = 101
        assert_eq!(block_on(s.sample(&mut src)), 101);
        assert_eq!(src.pos, 4);
    }

    #[test]
    fn failed_reads_are_skipped() {
        let mut s = Oversampler::new(&SamplerConfig::default());
        let mut src = Script::new(&[Some(4000), None, Some(4002), None]);
        assert_eq!(block_on(s.sample(&mut src)), 4001);
    }

    #[test]
    fn total_failure_reuses_last_value() {
        let mut s = Oversampler::new(&SamplerConfig::default());
        let mut good = Script::new(&[Some(1234); 4]);
        assert_eq!(block_on(s.sample(&mut good)), 1234);

        let mut dead = Script::new(&[]);
        assert_eq!(block_on(s.sample(&mut dead)), 1234);
        assert_eq!(s.last(), 1234);
    }

    #[test]
    fn full_scale_does_not_overflow() {
        let config = SamplerConfig { oversample: 255, ..Default::default() };
        let mut s = Oversampler::new(&config);
        let results = [Some(u16::MAX); 255];
        let mut src = Script::new(&results);
        assert_eq!(block_on(s.sample(&mut src)), u16::MAX);
    }

    #[test]
    fn validate_rejects_zero_oversample() {
        assert_eq!(SamplerConfig::default().validate(), Ok(()));
        let config = SamplerConfig { oversample: 0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::ZeroOversample));
    }

    #[test]
    fn zero_oversample_reads_once() {
        let config = SamplerConfig { oversample: 0, ..Default::default() };
        let mut s = Oversampler::new(&config);
        let mut src = Script::new(&[Some(7), Some(9)]);
        assert_eq!(block_on(s.sample(&mut src)), 7);
        assert_eq!(src.pos, 1);
    }
}
