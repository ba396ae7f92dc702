//! Whitened matched-filter cross-correlation.
//!
//! The filter spectrum is the conjugated forward transform of a reference
//! pulse. Correlating a signal whitens each of its bins to unit magnitude
//! (a zero bin stays zero) before multiplying by the filter, which sharpens
//! the correlogram peak at the pulse arrival lag.

use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D, Write1D};
use crate::signal::spectrum::{RealFftConfig, RealFftKernel};
use crate::signal::traits::Correlate1D;
use sonar_dsp_core::complex::{Sample, SampleExt, ZERO};

/// Constructor config for [`MatchedFilter`].
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedFilterConfig {
    /// Reference pulse. Must be non-empty and no longer than `size`.
    pub reference: Vec<f32>,
    /// Correlation length. Must be a power of two.
    pub size: usize,
}

/// Precomputed matched filter for one reference pulse.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedFilter {
    forward: RealFftKernel,
    spectrum: Vec<Sample>,
}

impl KernelLifecycle for MatchedFilter {
    type Config = MatchedFilterConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if config.reference.is_empty() {
            return Err(ConfigError::EmptyInput { arg: "reference" });
        }
        let forward = RealFftKernel::try_new(RealFftConfig::direct(config.size))?;
        let mut spectrum = vec![ZERO; config.size];
        forward
            .transform(&config.reference, &mut spectrum)
            .map_err(|_| ConfigError::InvalidArgument {
                arg: "reference",
                reason: "reference is longer than the correlation size",
            })?;
        for bin in spectrum.iter_mut() {
            *bin = bin.conj();
        }
        log::debug!(
            "matched filter: size={} reference_len={}",
            config.size,
            config.reference.len()
        );
        Ok(Self { forward, spectrum })
    }
}

impl MatchedFilter {
    /// Correlation length.
    pub fn size(&self) -> usize {
        self.spectrum.len()
    }

    /// Conjugated reference spectrum.
    pub fn spectrum(&self) -> &[Sample] {
        &self.spectrum
    }

    /// Whiten a forward-transformed signal and multiply it by the filter.
    ///
    /// Leaves the product in `spectrum`; the inverse transform of it is the
    /// correlogram. Use this when the spectrum is processed further (for
    /// example bandpassed) before correlating.
    pub fn correlate_spectrum(&self, spectrum: &mut [Sample]) -> Result<(), ExecInvariantViolation> {
        if spectrum.len() != self.size() {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "spectrum",
                expected: self.size(),
                got: spectrum.len(),
            });
        }
        for (bin, h) in spectrum.iter_mut().zip(&self.spectrum) {
            *bin = bin.normalize() * *h;
        }
        Ok(())
    }

    /// Inverse transform a filtered spectrum into a real correlogram.
    pub fn finish(
        &self,
        spectrum: &mut [Sample],
        out: &mut [f32],
    ) -> Result<(), ExecInvariantViolation> {
        if out.len() != self.size() {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "out",
                expected: self.size(),
                got: out.len(),
            });
        }
        self.forward.full_kernel().inverse(spectrum)?;
        for (dst, src) in out.iter_mut().zip(spectrum.iter()) {
            *dst = src.re;
        }
        Ok(())
    }

    fn correlate(&self, input: &[f32], out: &mut [f32]) -> Result<(), ExecInvariantViolation> {
        if input.iter().all(|&x| x == 0.0) {
            log::warn!("correlating an all-zero signal; correlogram is zero");
        }
        let mut spectrum = vec![ZERO; self.size()];
        self.forward.transform(input, &mut spectrum)?;
        self.correlate_spectrum(&mut spectrum)?;
        self.finish(&mut spectrum, out)
    }
}

impl Correlate1D<f32> for MatchedFilter {
    fn run_in_place<S>(&self, signal: &mut S) -> Result<(), ExecInvariantViolation>
    where
        S: Write1D<f32> + ?Sized,
    {
        let signal = signal
            .write_slice_mut()
            .map_err(ExecInvariantViolation::from)?;
        if signal.len() != self.size() {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "signal",
                expected: self.size(),
                got: signal.len(),
            });
        }
        let input = signal.to_vec();
        self.correlate(&input, signal)
    }

    fn run_alloc<I>(&self, input: &I) -> Result<Vec<f32>, ExecInvariantViolation>
    where
        I: Read1D<f32> + ?Sized,
    {
        let input = input.read_slice().map_err(ExecInvariantViolation::from)?;
        let mut out = vec![0.0; self.size()];
        self.correlate(input, &mut out)?;
        Ok(out)
    }
}

/// Build a matched filter for `reference` at correlation length `size`.
pub fn xcorr_init(reference: &[f32], size: usize) -> Result<MatchedFilter, ConfigError> {
    MatchedFilter::try_new(MatchedFilterConfig {
        reference: reference.to_vec(),
        size,
    })
}

/// Replace `signal` with its whitened correlogram against `filter`.
pub fn xcorr(filter: &MatchedFilter, signal: &mut [f32]) -> Result<(), ExecInvariantViolation> {
    filter.run_in_place(signal)
}
