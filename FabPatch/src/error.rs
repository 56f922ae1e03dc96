//! Error types for `FabPatch`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `FabPatch` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== Archive Errors ====================
    /// The path is missing, not a regular file, or not a readable zip container.
    #[error("invalid archive {path}: {reason}")]
    InvalidArchive {
        /// The archive that was rejected.
        path: PathBuf,
        /// Why it was rejected.
        reason: String,
    },

    // ==================== Manifest Errors ====================
    /// No `fabric.mod.json` at the root of the extracted archive.
    #[error("manifest not found")]
    ManifestMissing,

    /// `fabric.mod.json` exists but is not a usable manifest.
    #[error("malformed manifest: {0}")]
    ManifestMalformed(String),

    // ==================== Output Errors ====================
    /// Writing a manifest or output archive failed.
    #[error("failed to write {path}: {reason}")]
    WriteFailure {
        /// The file being written.
        path: PathBuf,
        /// The underlying failure.
        reason: String,
    },

    // ==================== Configuration Errors ====================
    /// The configuration file could not be read or parsed.
    #[error("config error in {path}: {reason}")]
    Config {
        /// The configuration file.
        path: PathBuf,
        /// The underlying failure.
        reason: String,
    },

    // ==================== Underlying Faults ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error. Manifest parse failures are reported as
    /// [`Error::ManifestMalformed`] instead.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Zip container error outside of archive validation.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDir(String),
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDir(err.to_string())
    }
}

/// Coarse classification of an [`Error`], carried by failed patch outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::InvalidArchive`].
    InvalidArchive,
    /// See [`Error::ManifestMissing`].
    ManifestMissing,
    /// See [`Error::ManifestMalformed`].
    ManifestMalformed,
    /// See [`Error::WriteFailure`].
    WriteFailure,
    /// Any other IO or unexpected fault.
    Other,
}

impl Error {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArchive { .. } => ErrorKind::InvalidArchive,
            Self::ManifestMissing => ErrorKind::ManifestMissing,
            Self::ManifestMalformed(_) => ErrorKind::ManifestMalformed,
            Self::WriteFailure { .. } => ErrorKind::WriteFailure,
            Self::Config { .. } | Self::Io(_) | Self::Json(_) | Self::Zip(_) | Self::WalkDir(_) => {
                ErrorKind::Other
            }
        }
    }

    pub(crate) fn invalid_archive(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::InvalidArchive {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write_failure(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::WriteFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// A specialized Result type for `FabPatch` operations.
pub type Result<T> = std::result::Result<T, Error>;
