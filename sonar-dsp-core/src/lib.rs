//! Shared building blocks for the `sonar-dsp` spectral engine.
//!
//! This crate holds the pieces that every other layer leans on: the
//! single-precision complex [`Sample`](complex::Sample) and its scalar
//! metrics, the power-of-two sizing helpers used to validate transform
//! lengths, and the crate-level [`Error`] type.

extern crate alloc;

pub mod complex;
mod error;
pub mod pow2;

pub use error::*;

/// Convenience alias for results carrying [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
