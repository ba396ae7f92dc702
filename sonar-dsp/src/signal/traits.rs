//! Trait interfaces for spectral-processing capabilities.
//!
//! Kernels implement these traits so callers can drive them either into a
//! caller-provided buffer (`run_into`) or into a freshly allocated one
//! (`run_alloc`).

use crate::kernel::{ExecInvariantViolation, Read1D, Write1D};

/// In-place transform over a complex buffer of fixed length.
pub trait Transform1D<T> {
    /// Transform `buffer` in place.
    fn run_in_place<B>(&self, buffer: &mut B) -> Result<(), ExecInvariantViolation>
    where
        B: Write1D<T> + ?Sized;
}

/// Real-signal to spectrum capability.
pub trait RealSpectrum1D<T, C> {
    /// Transform a real signal into a caller-provided spectrum buffer.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized,
        O: Write1D<C> + ?Sized;

    /// Transform a real signal and allocate the spectrum.
    fn run_alloc<I>(&self, input: &I) -> Result<Vec<C>, ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized;
}

/// Spectral-domain filtering capability.
pub trait SpectralFilter<C> {
    /// Filter a spectrum in place.
    fn apply<S>(&self, spectrum: &mut S) -> Result<(), ExecInvariantViolation>
    where
        S: Write1D<C> + ?Sized;
}

/// 1D convolution capability.
pub trait Convolve1D<T> {
    /// Run convolution into a caller-provided output buffer.
    fn run_into<I1, I2, O>(
        &self,
        in1: &I1,
        in2: &I2,
        out: &mut O,
    ) -> Result<(), ExecInvariantViolation>
    where
        I1: Read1D<T> + ?Sized,
        I2: Read1D<T> + ?Sized,
        O: Write1D<T> + ?Sized;

    /// Run convolution and allocate output.
    fn run_alloc<I1, I2>(&self, in1: &I1, in2: &I2) -> Result<Vec<T>, ExecInvariantViolation>
    where
        I1: Read1D<T> + ?Sized,
        I2: Read1D<T> + ?Sized;
}

/// Correlation against a reference held by the kernel.
pub trait Correlate1D<T> {
    /// Replace `signal` with its correlogram against the kernel's reference.
    fn run_in_place<S>(&self, signal: &mut S) -> Result<(), ExecInvariantViolation>
    where
        S: Write1D<T> + ?Sized;

    /// Correlate `input` against the reference and allocate the correlogram.
    fn run_alloc<I>(&self, input: &I) -> Result<Vec<T>, ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized;
}

/// 1D resampling capability.
pub trait Resample1D<T> {
    /// Run resampling into a caller-provided output buffer.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized,
        O: Write1D<T> + ?Sized;

    /// Run resampling and allocate output.
    fn run_alloc<I>(&self, input: &I) -> Result<Vec<T>, ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized;
}

/// Real to analytic signal capability.
pub trait Analytic1D<T, C> {
    /// Build the analytic signal into a caller-provided output buffer.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized,
        O: Write1D<C> + ?Sized;

    /// Build the analytic signal and allocate output.
    fn run_alloc<I>(&self, input: &I) -> Result<Vec<C>, ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized;
}

