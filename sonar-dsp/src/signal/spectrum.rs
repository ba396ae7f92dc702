//! Real-signal spectral adapter.
//!
//! Lifts a real sequence into a zero-padded complex buffer and runs the
//! forward transform. With more than one group the signal is split
//! polyphase-style into `groups` interleaved sub-blocks of `block_size`
//! samples each; the sub-block spectra are computed at the short length and
//! recombined into the full spectrum with per-group twiddle corrections:
//!
//! ```text
//! X[n] = P_0[n mod B] + Σ_{k=1}^{G-1} ω_S(n·k) · P_k[n mod B],   S = B·G
//! ```
//!
//! which follows from `x[m·G + k] = p_k[m]` and `ω_S^G = ω_B`.

use crate::kernel::{
    check_power_of_two, ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D, Write1D,
};
use crate::signal::fft::{Direction, FftConfig, FftKernel};
use crate::signal::traits::RealSpectrum1D;
use sonar_dsp_core::complex::{real, Sample, ZERO};

/// Constructor config for [`RealFftKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RealFftConfig {
    /// Length of each sub-block transform. Must be a power of two.
    pub block_size: usize,
    /// Number of interleaved sub-blocks. `1` selects the direct path.
    pub groups: usize,
}

impl RealFftConfig {
    /// Single-block transform of length `size`.
    pub fn direct(size: usize) -> Self {
        Self {
            block_size: size,
            groups: 1,
        }
    }
}

/// Real-signal forward transform, direct or grouped.
#[derive(Debug, Clone, PartialEq)]
pub struct RealFftKernel {
    block: FftKernel,
    groups: usize,
    // Full-length kernel, only needed for recombination twiddles.
    full: Option<FftKernel>,
}

impl KernelLifecycle for RealFftKernel {
    type Config = RealFftConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if config.groups == 0 {
            return Err(ConfigError::InvalidArgument {
                arg: "groups",
                reason: "group count must be > 0",
            });
        }
        let size = config
            .block_size
            .checked_mul(config.groups)
            .ok_or(ConfigError::InvalidArgument {
                arg: "groups",
                reason: "block_size * groups overflows",
            })?;
        check_power_of_two("size", size)?;
        let block = FftKernel::try_new(FftConfig {
            size: config.block_size,
        })?;
        let full = if config.groups > 1 {
            Some(FftKernel::try_new(FftConfig { size })?)
        } else {
            None
        };
        Ok(Self {
            block,
            groups: config.groups,
            full,
        })
    }
}

impl RealFftKernel {
    /// Spectrum length, `block_size * groups`.
    pub fn size(&self) -> usize {
        self.block.size() * self.groups
    }

    /// Number of interleaved sub-blocks.
    pub fn groups(&self) -> usize {
        self.groups
    }

    /// Kernel able to run the inverse transform at the full spectrum length.
    pub fn full_kernel(&self) -> &FftKernel {
        self.full.as_ref().unwrap_or(&self.block)
    }

    /// Transform `input` into `spectrum`, which must be exactly [`size`](Self::size) long.
    pub fn transform(
        &self,
        input: &[f32],
        spectrum: &mut [Sample],
    ) -> Result<(), ExecInvariantViolation> {
        let size = self.size();
        if input.len() > size {
            return Err(ExecInvariantViolation::TooLong {
                arg: "input",
                max: size,
                got: input.len(),
            });
        }
        if spectrum.len() != size {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "spectrum",
                expected: size,
                got: spectrum.len(),
            });
        }

        match &self.full {
            None => {
                spectrum.fill(ZERO);
                for (dst, &x) in spectrum.iter_mut().zip(input) {
                    *dst = real(x);
                }
                self.block.forward(spectrum)
            }
            Some(full) => self.transform_grouped(full, input, spectrum),
        }
    }

    fn transform_grouped(
        &self,
        full: &FftKernel,
        input: &[f32],
        spectrum: &mut [Sample],
    ) -> Result<(), ExecInvariantViolation> {
        let b = self.block.size();
        let g = self.groups;

        // parts[k * b + m] holds x[m * g + k]
        let mut parts = vec![ZERO; b * g];
        for (p, &x) in input.iter().enumerate() {
            parts[(p % g) * b + p / g] = real(x);
        }
        for part in parts.chunks_exact_mut(b) {
            self.block.forward(part)?;
        }

        for (n, bin) in spectrum.iter_mut().enumerate() {
            let j = n % b;
            let mut acc = parts[j];
            for k in 1..g {
                acc += full.twiddle(n * k, Direction::Forward) * parts[k * b + j];
            }
            *bin = acc;
        }
        Ok(())
    }
}

impl RealSpectrum1D<f32, Sample> for RealFftKernel {
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<f32> + ?Sized,
        O: Write1D<Sample> + ?Sized,
    {
        let input = input.read_slice().map_err(ExecInvariantViolation::from)?;
        let out = out.write_slice_mut().map_err(ExecInvariantViolation::from)?;
        self.transform(input, out)
    }

    fn run_alloc<I>(&self, input: &I) -> Result<Vec<Sample>, ExecInvariantViolation>
    where
        I: Read1D<f32> + ?Sized,
    {
        let input = input.read_slice().map_err(ExecInvariantViolation::from)?;
        let mut spectrum = vec![ZERO; self.size()];
        self.transform(input, &mut spectrum)?;
        Ok(spectrum)
    }
}

/// Spectrum of a real signal zero-padded to `size` points.
pub fn fft_real(signal: &[f32], size: usize) -> Result<Vec<Sample>, ExecInvariantViolation> {
    let kernel = RealFftKernel::try_new(RealFftConfig::direct(size))?;
    kernel.run_alloc(signal)
}

/// Spectrum of a real signal computed through `groups` interleaved sub-blocks.
pub fn fft_real_grouped(
    signal: &[f32],
    block_size: usize,
    groups: usize,
) -> Result<Vec<Sample>, ExecInvariantViolation> {
    let kernel = RealFftKernel::try_new(RealFftConfig { block_size, groups })?;
    kernel.run_alloc(signal)
}

/// Frequency-indexed read access to a spectrum sampled at `fs`.
#[derive(Debug, Clone, Copy)]
pub struct SpectrumView<'a> {
    fs: f32,
    bins: &'a [Sample],
}

impl<'a> SpectrumView<'a> {
    /// Wrap `bins`, a spectrum of a signal sampled at `fs`.
    pub fn new(fs: f32, bins: &'a [Sample]) -> Result<Self, ConfigError> {
        if !fs.is_finite() || fs <= 0.0 {
            return Err(ConfigError::InvalidArgument {
                arg: "fs",
                reason: "fs must be finite and > 0",
            });
        }
        if bins.is_empty() {
            return Err(ConfigError::EmptyInput { arg: "bins" });
        }
        Ok(Self { fs, bins })
    }

    /// Bin nearest to frequency `f`, or `None` when `f` maps outside the spectrum.
    pub fn bin_of(&self, f: f32) -> Option<usize> {
        let i = (f / self.fs * self.bins.len() as f32).round();
        if i >= 0.0 && (i as usize) < self.bins.len() {
            Some(i as usize)
        } else {
            None
        }
    }

    /// Centre frequency of bin `k`.
    pub fn frequency_of(&self, k: usize) -> f32 {
        k as f32 * self.fs / self.bins.len() as f32
    }

    /// Value of the bin nearest to frequency `f`.
    pub fn at(&self, f: f32) -> Option<Sample> {
        self.bin_of(f).map(|i| self.bins[i])
    }

    /// Underlying bins.
    pub fn bins(&self) -> &'a [Sample] {
        self.bins
    }
}
