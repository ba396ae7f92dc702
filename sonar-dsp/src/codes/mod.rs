//! Orthogonal code construction.

pub mod walsh;

pub use walsh::{walsh, WalshConfig, WalshTable};
