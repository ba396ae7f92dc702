//! Analytic signal construction through the Hilbert transform.
//!
//! The quadrature component comes from rotating positive-frequency bins by
//! -90° and negative-frequency bins by +90°. The DC bin and the Nyquist bin
//! are left as they are, so a DC offset in the input carries into the
//! quadrature part unchanged.

use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D, Write1D};
use crate::signal::spectrum::{RealFftConfig, RealFftKernel};
use crate::signal::traits::Analytic1D;
use sonar_dsp_core::complex::{Sample, SampleExt, ZERO};

/// Constructor config for [`HilbertKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HilbertConfig {
    /// Transform length. Must be a power of two.
    pub size: usize,
}

/// Hilbert quadrature kernel at a fixed transform length.
#[derive(Debug, Clone, PartialEq)]
pub struct HilbertKernel {
    forward: RealFftKernel,
}

impl KernelLifecycle for HilbertKernel {
    type Config = HilbertConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        let forward = RealFftKernel::try_new(RealFftConfig::direct(config.size))?;
        Ok(Self { forward })
    }
}

impl HilbertKernel {
    /// Transform length.
    pub fn size(&self) -> usize {
        self.forward.size()
    }

    fn analytic(&self, input: &[f32], out: &mut [Sample]) -> Result<(), ExecInvariantViolation> {
        if out.len() != input.len() {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "out",
                expected: input.len(),
                got: out.len(),
            });
        }
        let n = self.size();
        let mut quad = vec![ZERO; n];
        self.forward.transform(input, &mut quad)?;

        let half = n / 2;
        if half > 0 {
            for bin in &mut quad[1..half] {
                *bin = bin.rotate_cw();
            }
            for bin in &mut quad[half + 1..] {
                *bin = bin.rotate_ccw();
            }
        }
        self.forward.full_kernel().inverse(&mut quad)?;

        for ((dst, &x), q) in out.iter_mut().zip(input).zip(&quad) {
            *dst = Sample::new(x, q.re);
        }
        Ok(())
    }
}

impl Analytic1D<f32, Sample> for HilbertKernel {
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<f32> + ?Sized,
        O: Write1D<Sample> + ?Sized,
    {
        let input = input.read_slice().map_err(ExecInvariantViolation::from)?;
        let out = out.write_slice_mut().map_err(ExecInvariantViolation::from)?;
        self.analytic(input, out)
    }

    fn run_alloc<I>(&self, input: &I) -> Result<Vec<Sample>, ExecInvariantViolation>
    where
        I: Read1D<f32> + ?Sized,
    {
        let input = input.read_slice().map_err(ExecInvariantViolation::from)?;
        let mut out = vec![ZERO; input.len()];
        self.analytic(input, &mut out)?;
        Ok(out)
    }
}

/// Analytic signal of `x`, transformed at `size` points and truncated to `x.len()`.
pub fn hilbert(x: &[f32], size: usize) -> Result<Vec<Sample>, ExecInvariantViolation> {
    HilbertKernel::try_new(HilbertConfig { size })?.run_alloc(x)
}
