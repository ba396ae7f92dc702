use alloc::string::String;
use core::{error, fmt};

/// Errors raised by the free-function layer of sonar-dsp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An argument passed into a function was invalid.
    InvalidArg {
        /// The invalid argument.
        arg: String,
        /// Why the argument is invalid.
        reason: String,
    },
    /// An index or range reached past the end of a buffer.
    OutOfRange {
        /// Name of the argument that was indexed.
        arg: String,
        /// First index that does not exist.
        index: usize,
        /// Length of the indexed buffer.
        len: usize,
    },
    /// Two or more arguments conflict with each other.
    ConflictArg {
        /// Explaining which arguments conflict.
        reason: String,
    },
    /// Execution was attempted with a violated kernel invariant.
    ExecInvariantViolation {
        /// Why execution could not proceed.
        reason: String,
    },
}

impl Error {
    /// Shorthand for [`Error::InvalidArg`].
    pub fn invalid_arg(arg: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidArg {
            arg: arg.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArg { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
            Error::OutOfRange { arg, index, len } => {
                write!(f, "Index {index} is out of range for `{arg}` of length {len}.")
            }
            Error::ConflictArg { reason } => write!(f, "Conflicting arguments: {reason}"),
            Error::ExecInvariantViolation { reason } => {
                write!(f, "Execution invariant violation: {reason}")
            }
        }
    }
}

impl error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::Error;
    use alloc::string::ToString;

    #[test]
    fn display_names_the_argument() {
        let err = Error::invalid_arg("size", "size must be a power of two");
        assert_eq!(
            err.to_string(),
            "Invalid argument `size`: size must be a power of two"
        );
    }

    #[test]
    fn display_out_of_range() {
        let err = Error::OutOfRange {
            arg: "signal".into(),
            index: 12,
            len: 8,
        };
        assert_eq!(
            err.to_string(),
            "Index 12 is out of range for `signal` of length 8."
        );
    }
}
