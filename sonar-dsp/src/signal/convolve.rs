//! Circular convolution through the spectral product.

use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D, Write1D};
use crate::signal::spectrum::{RealFftConfig, RealFftKernel};
use crate::signal::traits::Convolve1D;
use sonar_dsp_core::complex::ZERO;
use sonar_dsp_core::pow2::min_pow2_for;

/// Constructor config for [`ConvolveKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvolveConfig {
    /// Circular length. Must be a power of two.
    pub size: usize,
}

/// Circular convolution at a fixed power-of-two length.
///
/// Both operands are zero-padded to `size`, so their lengths must not
/// exceed it. The output always has exactly `size` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvolveKernel {
    forward: RealFftKernel,
}

impl KernelLifecycle for ConvolveKernel {
    type Config = ConvolveConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        let forward = RealFftKernel::try_new(RealFftConfig::direct(config.size))?;
        Ok(Self { forward })
    }
}

impl ConvolveKernel {
    /// Circular length.
    pub fn size(&self) -> usize {
        self.forward.size()
    }

    fn convolve_slices(
        &self,
        a: &[f32],
        b: &[f32],
        out: &mut [f32],
    ) -> Result<(), ExecInvariantViolation> {
        let size = self.size();
        if out.len() != size {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "out",
                expected: size,
                got: out.len(),
            });
        }
        let mut fa = vec![ZERO; size];
        let mut fb = vec![ZERO; size];
        self.forward.transform(a, &mut fa)?;
        self.forward.transform(b, &mut fb)?;
        for (x, y) in fa.iter_mut().zip(&fb) {
            *x *= *y;
        }
        self.forward.full_kernel().inverse(&mut fa)?;
        for (dst, src) in out.iter_mut().zip(&fa) {
            *dst = src.re;
        }
        Ok(())
    }
}

impl Convolve1D<f32> for ConvolveKernel {
    fn run_into<I1, I2, O>(
        &self,
        in1: &I1,
        in2: &I2,
        out: &mut O,
    ) -> Result<(), ExecInvariantViolation>
    where
        I1: Read1D<f32> + ?Sized,
        I2: Read1D<f32> + ?Sized,
        O: Write1D<f32> + ?Sized,
    {
        let a = in1.read_slice().map_err(ExecInvariantViolation::from)?;
        let b = in2.read_slice().map_err(ExecInvariantViolation::from)?;
        let out = out.write_slice_mut().map_err(ExecInvariantViolation::from)?;
        self.convolve_slices(a, b, out)
    }

    fn run_alloc<I1, I2>(&self, in1: &I1, in2: &I2) -> Result<Vec<f32>, ExecInvariantViolation>
    where
        I1: Read1D<f32> + ?Sized,
        I2: Read1D<f32> + ?Sized,
    {
        let a = in1.read_slice().map_err(ExecInvariantViolation::from)?;
        let b = in2.read_slice().map_err(ExecInvariantViolation::from)?;
        let mut out = vec![0.0; self.size()];
        self.convolve_slices(a, b, &mut out)?;
        Ok(out)
    }
}

/// Circular convolution of `a` and `b` at length `size`.
pub fn convolve(a: &[f32], b: &[f32], size: usize) -> Result<Vec<f32>, ExecInvariantViolation> {
    let kernel = ConvolveKernel::try_new(ConvolveConfig { size })?;
    kernel.run_alloc(a, b)
}

/// Full linear convolution of `a` and `b`, `a.len() + b.len() - 1` samples.
///
/// Runs the circular kernel at [`min_pow2_for`] so the tail never wraps.
pub fn convolve_linear(a: &[f32], b: &[f32]) -> Result<Vec<f32>, ExecInvariantViolation> {
    if a.is_empty() {
        return Err(ConfigError::EmptyInput { arg: "a" }.into());
    }
    if b.is_empty() {
        return Err(ConfigError::EmptyInput { arg: "b" }.into());
    }
    let mut out = convolve(a, b, min_pow2_for(a.len(), b.len()))?;
    out.truncate(a.len() + b.len() - 1);
    Ok(out)
}
