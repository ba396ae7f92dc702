//! Radix-2 decimation-in-time FFT over a fixed power-of-two length.
//!
//! The transform runs in place: a bit-reversal permutation followed by
//! `log2(N)` butterfly stages. The kernel owns a table of forward twiddle
//! factors `ω(k) = e^{-2πik/N}` built once at construction; the inverse
//! direction uses their conjugates and divides every output sample by `N`,
//! so callers never rescale an inverse transform themselves.

use crate::kernel::{
    check_power_of_two, ConfigError, ExecInvariantViolation, KernelLifecycle, Write1D,
};
use crate::signal::traits::Transform1D;
use core::f64::consts::PI;
use sonar_dsp_core::complex::{Sample, Zero};

/// Twiddle policy of a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `ω(k) = e^{-2πik/N}`; yields the unnormalized DFT.
    Forward,
    /// `ω(k) = e^{+2πik/N}`, then every sample is divided by `N`.
    Inverse,
}

/// Constructor config for [`FftKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FftConfig {
    /// Transform length. Must be a power of two.
    pub size: usize,
}

/// Fixed-length radix-2 FFT/IFFT kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct FftKernel {
    size: usize,
    stages: u32,
    twiddles: Vec<Sample>,
}

impl KernelLifecycle for FftKernel {
    type Config = FftConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        let stages = check_power_of_two("size", config.size)?;
        let n = config.size as f64;
        let twiddles = (0..config.size)
            .map(|k| {
                let theta = -2.0 * PI * k as f64 / n;
                Sample::new(theta.cos() as f32, theta.sin() as f32)
            })
            .collect();
        log::debug!("fft kernel: size={} stages={stages}", config.size);
        Ok(Self {
            size: config.size,
            stages,
            twiddles,
        })
    }
}

impl FftKernel {
    /// Transform length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of butterfly stages, `log2(size)`.
    pub fn stages(&self) -> u32 {
        self.stages
    }

    /// Twiddle factor `ω(k)` for this length; `k` is taken modulo the size.
    #[inline]
    pub fn twiddle(&self, k: usize, direction: Direction) -> Sample {
        let w = self.twiddles[k & (self.size - 1)];
        match direction {
            Direction::Forward => w,
            Direction::Inverse => w.conj(),
        }
    }

    /// Transform `buffer` in place.
    pub fn process(
        &self,
        buffer: &mut [Sample],
        direction: Direction,
    ) -> Result<(), ExecInvariantViolation> {
        if buffer.len() != self.size {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "buffer",
                expected: self.size,
                got: buffer.len(),
            });
        }

        bit_reverse_permute(buffer);
        self.butterflies(buffer, direction);

        if direction == Direction::Inverse {
            let n = self.size as f32;
            for x in buffer.iter_mut() {
                *x = *x / n;
            }
        }
        Ok(())
    }

    /// Forward transform in place.
    pub fn forward(&self, buffer: &mut [Sample]) -> Result<(), ExecInvariantViolation> {
        self.process(buffer, Direction::Forward)
    }

    /// Inverse transform in place, already divided by the size.
    pub fn inverse(&self, buffer: &mut [Sample]) -> Result<(), ExecInvariantViolation> {
        self.process(buffer, Direction::Inverse)
    }

    /// Bind a direction, producing a [`Transform1D`] capability.
    pub fn directed(&self, direction: Direction) -> DirectedFft<'_> {
        DirectedFft {
            kernel: self,
            direction,
        }
    }

    fn butterflies(&self, buffer: &mut [Sample], direction: Direction) {
        let n = self.size;
        let mut m = 1;
        while m < n {
            let s = n / (2 * m);
            for block in buffer.chunks_exact_mut(2 * m) {
                let (lo, hi) = block.split_at_mut(m);
                for (j, (a, b)) in lo.iter_mut().zip(hi.iter_mut()).enumerate() {
                    // 0 * ω is 0, so the pair collapses to a copy.
                    if b.is_zero() {
                        *b = *a;
                    } else {
                        let t = *b * self.twiddle(s * j, direction);
                        *b = *a - t;
                        *a += t;
                    }
                }
            }
            m <<= 1;
        }
    }
}

/// A kernel bound to one transform direction.
#[derive(Debug, Clone, Copy)]
pub struct DirectedFft<'a> {
    kernel: &'a FftKernel,
    direction: Direction,
}

impl Transform1D<Sample> for DirectedFft<'_> {
    fn run_in_place<B>(&self, buffer: &mut B) -> Result<(), ExecInvariantViolation>
    where
        B: Write1D<Sample> + ?Sized,
    {
        let buffer = buffer
            .write_slice_mut()
            .map_err(ExecInvariantViolation::from)?;
        self.kernel.process(buffer, self.direction)
    }
}

/// Reorder `buf` so element `i` lands at the bit-reversal of `i`.
///
/// `buf.len()` must be a power of two. The reversed counter `j` is advanced
/// with an XOR walk from the top bit down instead of reversing each index.
fn bit_reverse_permute<T>(buf: &mut [T]) {
    let n = buf.len();
    let mut j = 0usize;
    for i in 0..n {
        if i > j {
            buf.swap(i, j);
        }
        let mut l = n >> 1;
        while l > 0 {
            j ^= l;
            if j >= l {
                break;
            }
            l >>= 1;
        }
    }
}

/// Index order produced by the bit-reversal permutation at length `n`.
pub fn bit_reversal_order(n: usize) -> Result<Vec<usize>, ConfigError> {
    check_power_of_two("n", n)?;
    let mut order = (0..n).collect::<Vec<_>>();
    bit_reverse_permute(&mut order);
    Ok(order)
}

/// Forward FFT of `buffer` in place; the length must be a power of two.
pub fn fft(buffer: &mut [Sample]) -> Result<(), ExecInvariantViolation> {
    let kernel = FftKernel::try_new(FftConfig { size: buffer.len() })?;
    kernel.forward(buffer)
}

/// Inverse FFT of `buffer` in place, divided by its length.
pub fn ifft(buffer: &mut [Sample]) -> Result<(), ExecInvariantViolation> {
    let kernel = FftKernel::try_new(FftConfig { size: buffer.len() })?;
    kernel.inverse(buffer)
}
