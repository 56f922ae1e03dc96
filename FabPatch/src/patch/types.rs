//! Types for patch outcomes and progress tracking

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ErrorKind;
use crate::manifest::{MANIFEST_PATH, PatchWarning};

/// Classified result of patching one archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The manifest was retargeted and a new archive written.
    Patched {
        /// The input archive.
        source: PathBuf,
        /// The rewritten archive (`_patched_<name>`).
        output: PathBuf,
        /// Non-fatal issue found while patching.
        warning: Option<PatchWarning>,
    },
    /// The mod declares no Minecraft dependency; the original was copied through.
    AlreadyCompatible {
        /// The input archive.
        source: PathBuf,
        /// Where the verbatim copy lives.
        output: PathBuf,
    },
    /// Processing failed; no output was written.
    Error {
        /// The input archive.
        source: PathBuf,
        /// Error classification.
        kind: ErrorKind,
        /// Human-readable detail.
        message: String,
    },
}

impl PatchOutcome {
    /// The archive this outcome belongs to.
    #[must_use]
    pub fn source(&self) -> &Path {
        match self {
            Self::Patched { source, .. }
            | Self::AlreadyCompatible { source, .. }
            | Self::Error { source, .. } => source,
        }
    }

    /// The file written to the output directory, if any.
    #[must_use]
    pub fn output(&self) -> Option<&Path> {
        match self {
            Self::Patched { output, .. } | Self::AlreadyCompatible { output, .. } => Some(output),
            Self::Error { .. } => None,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    #[must_use]
    pub fn warning(&self) -> Option<PatchWarning> {
        match self {
            Self::Patched { warning, .. } => *warning,
            _ => None,
        }
    }

    /// Warning line for the summary and the log, if this outcome carries one.
    #[must_use]
    pub fn warning_message(&self) -> Option<String> {
        match self.warning()? {
            PatchWarning::NameFieldMissing => Some(format!(
                "Warning: 'name' field not found in {MANIFEST_PATH} of {}.",
                self.source().display()
            )),
        }
    }
}

impl fmt::Display for PatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Patched { output, .. } => {
                write!(f, "Patched mod saved as {}", output.display())
            }
            Self::AlreadyCompatible { source, .. } => write!(
                f,
                "Already compatible: {} (no Minecraft version dependency)",
                source.display()
            ),
            Self::Error { source, message, .. } => {
                write!(f, "Error patching {}: {message}", source.display())
            }
        }
    }
}

/// Progress callback type for patch operations
pub type PatchProgressCallback<'a> = &'a (dyn Fn(&PatchProgress) + Sync + Send);

/// Progress information during patch operations
#[derive(Debug, Clone)]
pub struct PatchProgress {
    /// Current pipeline phase
    pub phase: PatchPhase,
    /// Current item number (1-indexed)
    pub current: usize,
    /// Total number of items
    pub total: usize,
    /// Archive being processed (if applicable)
    pub current_file: Option<String>,
}

impl PatchProgress {
    /// Create a progress update with a file/item name
    #[must_use]
    pub fn with_file(phase: PatchPhase, current: usize, total: usize, file: impl Into<String>) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: Some(file.into()),
        }
    }
}

/// Phase of the per-archive pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchPhase {
    /// Checking the input path
    Validating,
    /// Unpacking into the scratch tree
    Extracting,
    /// Reading `fabric.mod.json`
    LoadingManifest,
    /// Rewriting the dependency and name
    ApplyingPatch,
    /// Copying an already compatible archive through
    CopyingOriginal,
    /// Writing the manifest back
    SavingManifest,
    /// Building the output archive
    Repacking,
    /// Outcome decided
    Complete,
}

impl PatchPhase {
    /// Number of steps reported for a single archive.
    pub const STEPS: usize = 6;

    /// Step index of this phase within [`Self::STEPS`].
    #[must_use]
    pub fn step(self) -> usize {
        match self {
            Self::Validating => 0,
            Self::Extracting => 1,
            Self::LoadingManifest => 2,
            Self::ApplyingPatch => 3,
            Self::CopyingOriginal | Self::SavingManifest => 4,
            Self::Repacking => 5,
            Self::Complete => Self::STEPS,
        }
    }

    /// Get a human-readable description of this phase
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validating => "Validating archive",
            Self::Extracting => "Extracting",
            Self::LoadingManifest => "Reading fabric.mod.json",
            Self::ApplyingPatch => "Applying version patch",
            Self::CopyingOriginal => "Copying original",
            Self::SavingManifest => "Saving manifest",
            Self::Repacking => "Repacking",
            Self::Complete => "Complete",
        }
    }
}
