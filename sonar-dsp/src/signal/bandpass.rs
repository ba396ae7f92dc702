//! Bandpass filtering by spectral-index zeroing.
//!
//! Frequencies are plain integers in one shared unit (Hz, kHz, ...). Bin
//! indices are derived with truncating integer arithmetic:
//!
//! ```text
//! i0 = N·(f0 − bw/2) / fs      i2 = N − i1 − 1
//! i1 = N·(f0 + bw/2) / fs      i3 = N − i0 − 1
//! ```
//!
//! Bins in `[i0, i1]` and the mirrored `[i2, i3]` are kept, all others are
//! set to exact zero.

use crate::kernel::{
    check_power_of_two, ConfigError, ExecInvariantViolation, KernelLifecycle, Write1D,
};
use crate::signal::traits::SpectralFilter;
use sonar_dsp_core::complex::{Sample, ZERO};

/// Constructor config for [`BandpassKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandpassConfig {
    /// Spectrum length. Must be a power of two.
    pub size: usize,
    /// Sampling frequency.
    pub fs: u64,
    /// Passband centre frequency.
    pub f0: u64,
    /// Passband width. Must be at least 2.
    pub bw: u64,
}

/// Spectral bandpass kernel with precomputed bin boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandpassKernel {
    size: usize,
    i0: usize,
    i1: usize,
    i2: usize,
    i3: usize,
}

impl KernelLifecycle for BandpassKernel {
    type Config = BandpassConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        check_power_of_two("size", config.size)?;
        if config.fs == 0 {
            return Err(ConfigError::InvalidArgument {
                arg: "fs",
                reason: "fs must be > 0",
            });
        }
        if config.bw < 2 {
            return Err(ConfigError::InvalidArgument {
                arg: "bw",
                reason: "bandwidth must be >= 2",
            });
        }
        let half_bw = config.bw / 2;
        let low = config
            .f0
            .checked_sub(half_bw)
            .ok_or(ConfigError::InvalidArgument {
                arg: "f0",
                reason: "passband extends below zero frequency",
            })?;
        let overflow = ConfigError::InvalidArgument {
            arg: "f0",
            reason: "size * (f0 + bw/2) overflows u64",
        };
        let high = config.f0.checked_add(half_bw).ok_or(overflow.clone())?;

        let n = config.size as u64;
        let nyquist = config.size / 2;
        let bin = |f: u64| {
            n.checked_mul(f)
                .map(|v| (v / config.fs) as usize)
                .ok_or(overflow.clone())
        };
        let i0 = bin(low)?;
        let i1 = bin(high)?;
        if i0 >= nyquist {
            return Err(ConfigError::AboveNyquist {
                arg: "i0",
                index: i0,
                nyquist,
            });
        }
        if i1 >= nyquist {
            return Err(ConfigError::AboveNyquist {
                arg: "i1",
                index: i1,
                nyquist,
            });
        }
        let i2 = config.size - i1 - 1;
        let i3 = config.size - i0 - 1;
        log::debug!(
            "bandpass kernel: size={} passband=[{i0}, {i1}] mirror=[{i2}, {i3}]",
            config.size
        );
        Ok(Self {
            size: config.size,
            i0,
            i1,
            i2,
            i3,
        })
    }
}

impl BandpassKernel {
    /// Spectrum length this filter applies to.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Boundary bins `[i0, i1, i2, i3]`.
    pub fn bounds(&self) -> [usize; 4] {
        [self.i0, self.i1, self.i2, self.i3]
    }

    /// Zero every bin outside the passband and its mirror.
    pub fn filter(&self, spectrum: &mut [Sample]) -> Result<(), ExecInvariantViolation> {
        if spectrum.len() != self.size {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "spectrum",
                expected: self.size,
                got: spectrum.len(),
            });
        }
        spectrum[..self.i0].fill(ZERO);
        spectrum[self.i1 + 1..self.i2].fill(ZERO);
        spectrum[self.i3 + 1..].fill(ZERO);
        Ok(())
    }
}

impl SpectralFilter<Sample> for BandpassKernel {
    fn apply<S>(&self, spectrum: &mut S) -> Result<(), ExecInvariantViolation>
    where
        S: Write1D<Sample> + ?Sized,
    {
        let spectrum = spectrum
            .write_slice_mut()
            .map_err(ExecInvariantViolation::from)?;
        self.filter(spectrum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::spectrum::fft_real;
    use sonar_dsp_core::complex::Zero;

    fn kernel(size: usize, fs: u64, f0: u64, bw: u64) -> Result<BandpassKernel, ConfigError> {
        BandpassKernel::try_new(BandpassConfig { size, fs, f0, bw })
    }

    #[test]
    fn derives_boundaries_with_integer_truncation() {
        // 8192 * 38 / 600 = 518.8, 8192 * 62 / 600 = 846.5
        let k = kernel(8192, 600, 50, 24).expect("valid band");
        assert_eq!(k.bounds(), [518, 846, 7345, 7673]);
    }

    #[test]
    fn zeroes_outside_band_only() {
        let k = kernel(64, 64, 16, 8).expect("valid band");
        let [i0, i1, i2, i3] = k.bounds();
        assert_eq!([i0, i1, i2, i3], [12, 20, 43, 51]);

        let mut spectrum = vec![Sample::new(1.0, -1.0); 64];
        k.filter(&mut spectrum).expect("filter");
        for (idx, bin) in spectrum.iter().enumerate() {
            let kept = (i0..=i1).contains(&idx) || (i2..=i3).contains(&idx);
            assert_eq!(!bin.is_zero(), kept, "bin {idx}");
        }
    }

    #[test]
    fn filtering_is_idempotent() {
        let x = (0..200).map(|i| ((i * 7919) % 101) as f32 - 50.0).collect::<Vec<_>>();
        let mut once = fft_real(&x, 256).expect("fft_real");
        let k = kernel(256, 48_000, 9_000, 3_000).expect("valid band");
        k.apply(once.as_mut_slice()).expect("first pass");
        let mut twice = once.clone();
        k.apply(twice.as_mut_slice()).expect("second pass");
        assert_eq!(once, twice);
    }

    #[test]
    fn rejects_invalid_bands() {
        assert!(matches!(
            kernel(64, 64, 16, 1),
            Err(ConfigError::InvalidArgument { arg: "bw", .. })
        ));
        assert!(matches!(
            kernel(64, 64, 30, 8),
            Err(ConfigError::AboveNyquist { arg: "i1", .. })
        ));
        assert!(matches!(
            kernel(64, 64, 40, 4),
            Err(ConfigError::AboveNyquist { arg: "i0", .. })
        ));
        assert!(matches!(
            kernel(64, 64, 2, 8),
            Err(ConfigError::InvalidArgument { arg: "f0", .. })
        ));
        assert!(matches!(
            kernel(100, 64, 16, 8),
            Err(ConfigError::NotPowerOfTwo { .. })
        ));
    }

    #[test]
    fn rejects_band_edges_that_overflow() {
        assert!(matches!(
            kernel(64, u64::MAX, u64::MAX - 1, 8),
            Err(ConfigError::InvalidArgument { arg: "f0", .. })
        ));
        assert!(matches!(
            kernel(1 << 20, u64::MAX, u64::MAX / 4, 8),
            Err(ConfigError::InvalidArgument { arg: "f0", .. })
        ));
        // large but representable products still resolve: 2^17 ± 2^9
        let k = kernel(1 << 20, 1 << 40, 1 << 37, 1 << 30).expect("valid band");
        assert_eq!(k.bounds()[..2], [130_560, 131_584]);
    }

    #[test]
    fn rejects_wrong_spectrum_length() {
        let k = kernel(64, 64, 16, 8).expect("valid band");
        let mut spectrum = vec![Sample::new(1.0, 0.0); 32];
        assert!(k.filter(&mut spectrum).is_err());
    }
}
