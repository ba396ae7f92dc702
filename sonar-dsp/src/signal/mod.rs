//! Spectral signal processing built on the radix-2 engine in [`fft`].
//!
//! Each algorithm is a kernel (see [`crate::kernel`]) with a convenience free
//! function alongside it.

pub mod bandpass;
pub mod buffer;
pub mod convolve;
pub mod correlate;
pub mod fft;
pub mod hilbert;
pub mod pam;
pub mod peak;
pub mod resample;
pub mod spectrum;
pub mod traits;

pub use bandpass::{BandpassConfig, BandpassKernel};
pub use convolve::{convolve, convolve_linear};
pub use correlate::{xcorr, xcorr_init, MatchedFilter};
pub use fft::{fft, ifft, Direction, FftKernel};
pub use hilbert::hilbert;
pub use pam::dual_tone;
pub use resample::resample;
pub use spectrum::{fft_real, fft_real_grouped, SpectrumView};
