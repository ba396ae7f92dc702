//! Frequency-domain resampling.
//!
//! The signal is first upsampled by an integer factor `times` by spectral
//! zero-stuffing, then decimated by nearest-index selection to approximate
//! the target rate:
//!
//! 1. forward transform at `size0`;
//! 2. widen the spectrum to `times * size0`, moving the upper half
//!    `[size0/2, size0)` to the tail and zero-filling the gap;
//! 3. inverse transform at `times * size0`;
//! 4. take every `step = round(f0 * times / f1)`-th sample into exactly
//!    `size1` outputs, zero-filling once the source runs out.
//!
//! Only when `f0 * times / f1` is an integer is the new rate exact; larger
//! `times` brings an inexact ratio closer.
//!
//! The inverse divides by the enlarged length, so upsampled output carries
//! a gain of `1 / times` relative to the source.

use crate::kernel::{
    check_power_of_two, ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D, Write1D,
};
use crate::signal::fft::{FftConfig, FftKernel};
use crate::signal::spectrum::{RealFftConfig, RealFftKernel};
use crate::signal::traits::Resample1D;
use sonar_dsp_core::complex::ZERO;

/// Constructor config for [`ResampleKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResampleConfig {
    /// Source transform length; inputs may be shorter. Must be a power of two.
    pub size0: usize,
    /// Number of output samples.
    pub size1: usize,
    /// Upsampling factor before decimation. `times * size0` must be a power of two.
    pub times: usize,
    /// Source sampling rate.
    pub f0: f32,
    /// Target sampling rate.
    pub f1: f32,
}

/// Fixed-shape resampler from rate `f0` to rate `f1`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampleKernel {
    forward: RealFftKernel,
    enlarged: FftKernel,
    size1: usize,
    times: usize,
    step: usize,
}

impl KernelLifecycle for ResampleKernel {
    type Config = ResampleConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if config.times == 0 {
            return Err(ConfigError::InvalidArgument {
                arg: "times",
                reason: "upsampling factor must be > 0",
            });
        }
        for (arg, f) in [("f0", config.f0), ("f1", config.f1)] {
            if !f.is_finite() || f <= 0.0 {
                return Err(ConfigError::InvalidArgument {
                    arg,
                    reason: "sampling rate must be finite and > 0",
                });
            }
        }
        let forward = RealFftKernel::try_new(RealFftConfig::direct(config.size0))?;
        let wide = config
            .size0
            .checked_mul(config.times)
            .ok_or(ConfigError::InvalidArgument {
                arg: "times",
                reason: "times * size0 overflows",
            })?;
        check_power_of_two("times * size0", wide)?;
        let enlarged = FftKernel::try_new(FftConfig { size: wide })?;

        let ratio = config.f0 * config.times as f32 / config.f1;
        let step = ratio.round();
        if step < 1.0 {
            return Err(ConfigError::InvalidArgument {
                arg: "f1",
                reason: "target rate exceeds times * f0; raise `times`",
            });
        }
        if (ratio - step).abs() > f32::EPSILON * ratio {
            log::warn!(
                "resample ratio f0*times/f1 = {ratio} is not an integer; decimating by {step}"
            );
        }
        log::debug!(
            "resample kernel: size0={} times={} step={step} size1={}",
            config.size0,
            config.times,
            config.size1
        );
        Ok(Self {
            forward,
            enlarged,
            size1: config.size1,
            times: config.times,
            step: step as usize,
        })
    }
}

impl ResampleKernel {
    /// Number of output samples.
    pub fn size1(&self) -> usize {
        self.size1
    }

    /// Decimation step applied to the upsampled signal.
    pub fn step(&self) -> usize {
        self.step
    }

    fn resample_slices(&self, input: &[f32], out: &mut [f32]) -> Result<(), ExecInvariantViolation> {
        if out.len() != self.size1 {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "out",
                expected: self.size1,
                got: out.len(),
            });
        }
        let size0 = self.forward.size();
        let wide = self.enlarged.size();

        let mut spectrum = vec![ZERO; wide];
        self.forward.transform(input, &mut spectrum[..size0])?;
        // a length-1 source has no upper half; DC stays put
        let half = size0 / 2;
        if self.times > 1 && half > 0 {
            let (low, tail) = spectrum.split_at_mut(wide - half);
            tail.copy_from_slice(&low[half..2 * half]);
            low[half..2 * half].fill(ZERO);
        }
        self.enlarged.inverse(&mut spectrum)?;

        out.fill(0.0);
        for (dst, src) in out.iter_mut().zip(spectrum.iter().step_by(self.step)) {
            *dst = src.re;
        }
        Ok(())
    }
}

impl Resample1D<f32> for ResampleKernel {
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<f32> + ?Sized,
        O: Write1D<f32> + ?Sized,
    {
        let input = input.read_slice().map_err(ExecInvariantViolation::from)?;
        let out = out.write_slice_mut().map_err(ExecInvariantViolation::from)?;
        self.resample_slices(input, out)
    }

    fn run_alloc<I>(&self, input: &I) -> Result<Vec<f32>, ExecInvariantViolation>
    where
        I: Read1D<f32> + ?Sized,
    {
        let input = input.read_slice().map_err(ExecInvariantViolation::from)?;
        let mut out = vec![0.0; self.size1];
        self.resample_slices(input, &mut out)?;
        Ok(out)
    }
}

/// Resample `signal` from rate `f0` to rate `f1`.
///
/// See the module docs for the meaning of `size0`, `size1` and `times`.
pub fn resample(
    signal: &[f32],
    size0: usize,
    size1: usize,
    times: usize,
    f0: f32,
    f1: f32,
) -> Result<Vec<f32>, ExecInvariantViolation> {
    let kernel = ResampleKernel::try_new(ResampleConfig {
        size0,
        size1,
        times,
        f0,
        f1,
    })?;
    kernel.run_alloc(signal)
}
