//! Output error type.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use pfield_core::SimError;

/// Errors from writing or reading snapshot files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputError {
    /// A file or directory could not be created, written, or read.
    Io {
        /// Path involved.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },
    /// A snapshot file does not have the expected shape.
    Malformed {
        /// Path involved.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Description of the problem.
        reason: String,
    },
}

impl OutputError {
    pub(crate) fn io(path: &Path, err: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, reason } => write!(f, "{}: {reason}", path.display()),
            Self::Malformed { path, line, reason } => {
                write!(f, "{}:{line}: {reason}", path.display())
            }
        }
    }
}

impl Error for OutputError {}

impl From<OutputError> for SimError {
    fn from(e: OutputError) -> Self {
        match e {
            OutputError::Io { path, reason } => SimError::Io { path, reason },
            OutputError::Malformed { path, line, reason } => SimError::Io {
                path,
                reason: format!("line {line}: {reason}"),
            },
        }
    }
}
