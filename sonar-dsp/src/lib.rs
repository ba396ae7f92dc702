//! Radix-2 spectral engine for sonar signal simulation.
//!
//! Everything runs on fixed power-of-two transform lengths validated once
//! when a kernel is built:
//!
//! - [`signal::fft`]: in-place FFT/IFFT over [`complex::Sample`] buffers
//! - [`signal::spectrum`]: real-signal spectra, direct or polyphase-grouped
//! - [`signal::bandpass`]: spectral-index bandpass
//! - [`signal::convolve`], [`signal::correlate`], [`signal::resample`],
//!   [`signal::hilbert`]: algorithms composed from the transform
//! - [`codes::walsh`]: Walsh/Hadamard sign tables
//!
//! ```
//! use sonar_dsp::signal::{xcorr, xcorr_init};
//!
//! let pulse: Vec<f32> = (0..32).map(|i| ((i * i) as f32 * 0.05).sin()).collect();
//! let mut rx = vec![0.0f32; 1024];
//! rx[200..232].copy_from_slice(&pulse);
//!
//! let filter = xcorr_init(&pulse, 1024).unwrap();
//! xcorr(&filter, &mut rx).unwrap();
//! assert_eq!(sonar_dsp::signal::peak::argmax_abs(&rx), Some(200));
//! ```

pub use sonar_dsp_core::{complex, pow2, Error, Result};

/// Orthogonal code tables.
pub mod codes;

/// Kernel construction and buffer adapters.
pub mod kernel;

/// Spectral signal processing.
pub mod signal;
