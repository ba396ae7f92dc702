use core::fmt;

/// Validation errors raised at kernel construction or adapter binding time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required input or configuration field is empty.
    EmptyInput {
        /// Name of the argument that is empty.
        arg: &'static str,
    },
    /// A configuration argument value is invalid.
    InvalidArgument {
        /// Name of the argument.
        arg: &'static str,
        /// Human readable reason.
        reason: &'static str,
    },
    /// A transform length is not a power of two.
    NotPowerOfTwo {
        /// Name of the argument.
        arg: &'static str,
        /// Received length.
        got: usize,
    },
    /// A derived spectral index crossed the Nyquist bin.
    AboveNyquist {
        /// Name of the derived index.
        arg: &'static str,
        /// Derived bin index.
        index: usize,
        /// Nyquist bin (`size / 2`).
        nyquist: usize,
    },
    /// A contiguous 1D slice view could not be obtained.
    NonContiguous {
        /// Name of the argument that is non-contiguous.
        arg: &'static str,
    },
    /// Output/input lengths did not match required shape.
    LengthMismatch {
        /// Name of the argument.
        arg: &'static str,
        /// Required length.
        expected: usize,
        /// Received length.
        got: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyInput { arg } => write!(f, "Input `{arg}` was empty."),
            ConfigError::InvalidArgument { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
            ConfigError::NotPowerOfTwo { arg, got } => {
                write!(f, "Argument `{arg}` must be a power of two, got {got}.")
            }
            ConfigError::AboveNyquist {
                arg,
                index,
                nyquist,
            } => write!(
                f,
                "Bin `{arg}` = {index} is not below the Nyquist bin {nyquist}."
            ),
            ConfigError::NonContiguous { arg } => {
                write!(f, "Argument `{arg}` is not contiguous in memory.")
            }
            ConfigError::LengthMismatch { arg, expected, got } => {
                write!(
                    f,
                    "Length mismatch on `{arg}`. Expected {expected}, got {got}."
                )
            }
        }
    }
}

impl core::error::Error for ConfigError {}

/// Runtime execution invariant violations for checked kernel entrypoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecInvariantViolation {
    /// An execution precondition was violated.
    InvalidState {
        /// Human readable reason.
        reason: &'static str,
    },
    /// A buffer length mismatched the kernel's fixed size.
    LengthMismatch {
        /// Name of the argument.
        arg: &'static str,
        /// Required length.
        expected: usize,
        /// Received length.
        got: usize,
    },
    /// An input was longer than the transform that should hold it.
    TooLong {
        /// Name of the argument.
        arg: &'static str,
        /// Largest accepted length.
        max: usize,
        /// Received length.
        got: usize,
    },
    /// Adapter binding/configuration failure.
    Config(ConfigError),
}

impl From<ConfigError> for ExecInvariantViolation {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl fmt::Display for ExecInvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecInvariantViolation::InvalidState { reason } => {
                write!(f, "Execution invariant violation: {reason}")
            }
            ExecInvariantViolation::LengthMismatch { arg, expected, got } => {
                write!(
                    f,
                    "Execution length mismatch on `{arg}`. Expected {expected}, got {got}."
                )
            }
            ExecInvariantViolation::TooLong { arg, max, got } => {
                write!(
                    f,
                    "Input `{arg}` holds {got} samples but the transform fits at most {max}."
                )
            }
            ExecInvariantViolation::Config(err) => write!(f, "{err}"),
        }
    }
}

impl core::error::Error for ExecInvariantViolation {}

impl From<ConfigError> for sonar_dsp_core::Error {
    fn from(value: ConfigError) -> Self {
        sonar_dsp_core::Error::InvalidArg {
            arg: config_arg(&value).into(),
            reason: value.to_string(),
        }
    }
}

impl From<ExecInvariantViolation> for sonar_dsp_core::Error {
    fn from(value: ExecInvariantViolation) -> Self {
        match value {
            ExecInvariantViolation::Config(err) => err.into(),
            other => sonar_dsp_core::Error::ExecInvariantViolation {
                reason: other.to_string(),
            },
        }
    }
}

fn config_arg(err: &ConfigError) -> &'static str {
    match err {
        ConfigError::EmptyInput { arg }
        | ConfigError::InvalidArgument { arg, .. }
        | ConfigError::NotPowerOfTwo { arg, .. }
        | ConfigError::AboveNyquist { arg, .. }
        | ConfigError::NonContiguous { arg }
        | ConfigError::LengthMismatch { arg, .. } => arg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exec_error_wraps_config_error() {
        let err: ExecInvariantViolation = ConfigError::NotPowerOfTwo {
            arg: "size",
            got: 1000,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Argument `size` must be a power of two, got 1000."
        );
    }

    #[test]
    fn converts_into_crate_error() {
        let err: sonar_dsp_core::Error = ExecInvariantViolation::TooLong {
            arg: "signal",
            max: 64,
            got: 65,
        }
        .into();
        assert!(matches!(
            err,
            sonar_dsp_core::Error::ExecInvariantViolation { .. }
        ));

        let err: sonar_dsp_core::Error = ExecInvariantViolation::Config(ConfigError::EmptyInput {
            arg: "reference",
        })
        .into();
        match err {
            sonar_dsp_core::Error::InvalidArg { arg, .. } => assert_eq!(arg, "reference"),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
