//! Shared kernel substrate.
//!
//! Every spectral algorithm in this crate is a *kernel*: a small immutable
//! value built once from a plain config struct through
//! [`KernelLifecycle::try_new`], which performs all size and parameter
//! validation up front. Kernels then read and write caller buffers through
//! the [`Read1D`] / [`Write1D`] adapters.

mod errors;
mod io;
mod lifecycle;

pub use errors::*;
pub use io::*;
pub use lifecycle::*;
