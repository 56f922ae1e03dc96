//! Per-archive patch pipeline

use std::fs;
use std::path::{Path, PathBuf};

use super::types::{PatchOutcome, PatchPhase, PatchProgress, PatchProgressCallback};
use crate::archive::{self, DEFAULT_EXTENSIONS, has_archive_extension};
use crate::config::PatcherConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::log::PatchLog;
use crate::manifest::{self, PatchResult};

/// Prefix of rewritten archive names.
pub const PATCHED_PREFIX: &str = "_patched_";

/// Drives extraction, manifest patching and repacking for single archives.
///
/// Every call returns a classified [`PatchOutcome`]; failures never escape
/// as errors. All events are appended to the injected [`PatchLog`].
///
/// # Example
///
/// ```no_run
/// use fabpatch::log::MemoryLog;
/// use fabpatch::patch::ModPatcher;
///
/// let log = MemoryLog::new();
/// let patcher = ModPatcher::new("ready", &log);
/// let outcome = patcher.patch("CoolMod.jar", "1.21.3");
/// println!("{outcome}");
/// ```
pub struct ModPatcher<'a> {
    output_dir: PathBuf,
    extensions: Vec<String>,
    log: &'a dyn PatchLog,
}

impl<'a> ModPatcher<'a> {
    /// Create a patcher writing into `output_dir`, accepting `.jar` archives.
    pub fn new(output_dir: impl Into<PathBuf>, log: &'a dyn PatchLog) -> Self {
        Self {
            output_dir: output_dir.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            log,
        }
    }

    /// Create a patcher from a run configuration.
    pub fn from_config(config: &PatcherConfig, log: &'a dyn PatchLog) -> Self {
        Self::new(config.output_dir.clone(), log).with_extensions(config.extensions.clone())
    }

    /// Replace the recognized archive extensions.
    #[must_use]
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// The log events are written to.
    #[must_use]
    pub fn log(&self) -> &dyn PatchLog {
        self.log
    }

    /// Patch one archive.
    pub fn patch<P: AsRef<Path>>(&self, archive_path: P, target_version: &str) -> PatchOutcome {
        self.patch_with_progress(archive_path, target_version, &|_| {})
    }

    /// Patch one archive, reporting each pipeline phase.
    pub fn patch_with_progress<P: AsRef<Path>>(
        &self,
        archive_path: P,
        target_version: &str,
        progress: PatchProgressCallback,
    ) -> PatchOutcome {
        let source = archive_path.as_ref();
        self.log
            .append(&format!("Starting patch for {}...", source.display()));

        let outcome = match self.run(source, target_version, progress) {
            Ok(outcome) => outcome,
            Err(e) => PatchOutcome::Error {
                source: source.to_path_buf(),
                kind: e.kind(),
                message: e.to_string(),
            },
        };

        self.record(&outcome);
        report(progress, PatchPhase::Complete, source);
        outcome
    }

    /// Record an archive that is refused without running the pipeline.
    pub(crate) fn reject(
        &self,
        source: &Path,
        kind: ErrorKind,
        message: String,
        progress: PatchProgressCallback,
    ) -> PatchOutcome {
        let outcome = PatchOutcome::Error {
            source: source.to_path_buf(),
            kind,
            message,
        };
        self.record(&outcome);
        report(progress, PatchPhase::Complete, source);
        outcome
    }

    fn run(
        &self,
        source: &Path,
        target_version: &str,
        progress: PatchProgressCallback,
    ) -> Result<PatchOutcome> {
        report(progress, PatchPhase::Validating, source);
        let Some(file_name) = source.file_name().filter(|_| self.is_valid_archive(source)) else {
            return Ok(PatchOutcome::Error {
                source: source.to_path_buf(),
                kind: ErrorKind::InvalidArchive,
                message: "not a valid archive file".to_string(),
            });
        };

        report(progress, PatchPhase::Extracting, source);
        let tree = archive::extract(source)?;

        report(progress, PatchPhase::LoadingManifest, source);
        let mut manifest = manifest::load(&tree)?;

        report(progress, PatchPhase::ApplyingPatch, source);
        match manifest::apply_version_patch(&mut manifest, target_version)? {
            PatchResult::NoOpAlreadyCompatible => {
                report(progress, PatchPhase::CopyingOriginal, source);
                let output = self.output_dir.join(file_name);
                self.copy_original(source, &output)?;
                Ok(PatchOutcome::AlreadyCompatible {
                    source: source.to_path_buf(),
                    output,
                })
            }
            PatchResult::Patched { warning } => {
                report(progress, PatchPhase::SavingManifest, source);
                manifest::save(&manifest, &tree)?;

                report(progress, PatchPhase::Repacking, source);
                let output = self.output_dir.join(patched_file_name(file_name));
                self.ensure_output_dir()?;
                archive::repack(&tree, &output)?;

                Ok(PatchOutcome::Patched {
                    source: source.to_path_buf(),
                    output,
                    warning,
                })
            }
        }
    }

    fn is_valid_archive(&self, path: &Path) -> bool {
        path.is_file() && has_archive_extension(path, &self.extensions)
    }

    fn ensure_output_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| Error::write_failure(&self.output_dir, e))
    }

    /// Copy an archive verbatim into the output directory.
    fn copy_original(&self, source: &Path, output: &Path) -> Result<()> {
        self.ensure_output_dir()?;

        if is_same_file(source, output) {
            tracing::debug!("{} is already in the output directory", source.display());
            return Ok(());
        }

        if let Err(e) = fs::copy(source, output) {
            if output.exists() {
                if let Err(remove_err) = fs::remove_file(output) {
                    tracing::warn!("Failed to remove partial copy {}: {remove_err}", output.display());
                }
            }
            return Err(Error::write_failure(output, e));
        }
        Ok(())
    }

    fn record(&self, outcome: &PatchOutcome) {
        match outcome {
            PatchOutcome::Patched { source, output, .. } => {
                tracing::info!("Patched {} -> {}", source.display(), output.display());
                self.log.append(&format!(
                    "Successfully patched {} and saved as {}",
                    source.display(),
                    output.display()
                ));
                if let Some(warning) = outcome.warning_message() {
                    tracing::warn!("{warning}");
                    self.log.append(&warning);
                }
            }
            PatchOutcome::AlreadyCompatible { source, .. } => {
                tracing::info!("{} needs no patch", source.display());
                self.log.append(&outcome.to_string());
            }
            PatchOutcome::Error { .. } => {
                tracing::warn!("{outcome}");
                self.log.append(&outcome.to_string());
            }
        }
    }
}

/// Output file name for a rewritten archive: `_patched_<name>`.
#[must_use]
pub fn patched_file_name(file_name: &std::ffi::OsStr) -> std::ffi::OsString {
    let mut name = std::ffi::OsString::from(PATCHED_PREFIX);
    name.push(file_name);
    name
}

fn report(progress: PatchProgressCallback, phase: PatchPhase, source: &Path) {
    progress(&PatchProgress::with_file(
        phase,
        phase.step(),
        PatchPhase::STEPS,
        source.display().to_string(),
    ));
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
