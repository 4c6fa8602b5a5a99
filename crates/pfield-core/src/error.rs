//! Error types for the pfield simulation driver.
//!
//! [`ConfigError`] covers everything detected before device work begins
//! (input files, keys, value ranges). [`SimError`] is the run-level
//! taxonomy every fallible driver operation funnels into; the binary maps
//! any `SimError` to exit code 1.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Errors detected while reading or validating configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// An input file could not be opened or read.
    FileUnreadable {
        /// Path of the file.
        path: PathBuf,
        /// Description of the underlying I/O failure.
        reason: String,
    },
    /// A required key is absent from the configuration records.
    MissingKey {
        /// The missing key.
        key: String,
    },
    /// A key is present but its value does not parse.
    InvalidValue {
        /// The offending key.
        key: String,
        /// The raw value text.
        value: String,
    },
    /// A parsed value violates a structural invariant.
    OutOfRange {
        /// The offending key.
        key: String,
        /// Description of the violated constraint.
        reason: String,
    },
    /// The requested model name is not one of the supported systems.
    UnknownModel {
        /// The name that was requested.
        name: String,
    },
    /// The requested platform or device index does not exist.
    NoSuchDevice {
        /// Description of which index was out of range.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileUnreadable { path, reason } => {
                write!(f, "cannot read {}: {reason}", path.display())
            }
            Self::MissingKey { key } => write!(f, "missing required key '{key}'"),
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value '{value}' for key '{key}'")
            }
            Self::OutOfRange { key, reason } => write!(f, "{key}: {reason}"),
            Self::UnknownModel { name } => write!(f, "unknown model '{name}'"),
            Self::NoSuchDevice { reason } => write!(f, "no such device: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// Run-level error taxonomy.
///
/// `Configuration` and `Build` abort before any device work; `Submission`
/// aborts the hot loop; `Io` aborts on the first failed checkpoint write.
/// Profiling failures never surface here, the driver logs them instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimError {
    /// Invalid or missing configuration, including device selection.
    Configuration(ConfigError),
    /// Kernel compilation failed; `log` is the compiler diagnostic verbatim.
    Build {
        /// Compiler diagnostic.
        log: String,
    },
    /// A device operation outside compilation failed.
    Submission {
        /// Description of the failed operation.
        reason: String,
    },
    /// An output file could not be created or written.
    Io {
        /// Path being written.
        path: PathBuf,
        /// Description of the underlying I/O failure.
        reason: String,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(e) => write!(f, "configuration error: {e}"),
            Self::Build { log } => write!(f, "kernel build failed:\n{log}"),
            Self::Submission { reason } => write!(f, "device submission failed: {reason}"),
            Self::Io { path, reason } => {
                write!(f, "cannot write {}: {reason}", path.display())
            }
        }
    }
}

impl Error for SimError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Configuration(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        Self::Configuration(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_wraps_into_configuration() {
        let err: SimError = ConfigError::MissingKey { key: "SIZE".into() }.into();
        assert!(matches!(err, SimError::Configuration(_)));
        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "configuration error: missing required key 'SIZE'"
        );
    }

    #[test]
    fn build_error_keeps_log_verbatim() {
        let log = "<kernel>:3:5: error: use of undeclared identifier 'COEFF'";
        let err = SimError::Build { log: log.into() };
        assert!(err.to_string().ends_with(log));
    }
}
