use super::ConfigError;
use sonar_dsp_core::pow2;

/// Constructor validation lifecycle shared by kernel structs.
pub trait KernelLifecycle: Sized {
    /// Kernel config type.
    type Config;

    /// Construct a validated kernel from config.
    fn try_new(config: Self::Config) -> Result<Self, ConfigError>;
}

/// Validate a transform length, returning its base-2 logarithm.
pub fn check_power_of_two(arg: &'static str, n: usize) -> Result<u32, ConfigError> {
    pow2::ilog2_exact(n).ok_or(ConfigError::NotPowerOfTwo { arg, got: n })
}
