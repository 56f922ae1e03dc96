//! Batch patch runs
//!
//! This module discovers mod archives, runs the patcher over them (in order,
//! or in parallel), and groups the outcomes for reporting.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::archive::has_archive_extension;
use crate::error::ErrorKind;
use crate::patch::{ModPatcher, PatchOutcome, PatchProgress};

/// Message appended to the log once a batch finishes.
pub const COMPLETION_MESSAGE: &str = "Patching completed.";

/// Outcomes of a batch run, in input order
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// One outcome per input archive.
    pub outcomes: Vec<PatchOutcome>,
}

impl BatchReport {
    /// Archives that were rewritten.
    pub fn patched(&self) -> impl Iterator<Item = &PatchOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, PatchOutcome::Patched { .. }))
    }

    /// Archives that were copied through unchanged.
    pub fn already_compatible(&self) -> impl Iterator<Item = &PatchOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, PatchOutcome::AlreadyCompatible { .. }))
    }

    /// Warning lines of patched archives.
    pub fn warnings(&self) -> impl Iterator<Item = String> + '_ {
        self.outcomes.iter().filter_map(PatchOutcome::warning_message)
    }

    /// Archives that failed.
    pub fn errors(&self) -> impl Iterator<Item = &PatchOutcome> {
        self.outcomes.iter().filter(|o| o.is_error())
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.outcomes.iter().any(PatchOutcome::is_error)
    }

    #[must_use]
    pub fn patched_count(&self) -> usize {
        self.patched().count()
    }

    #[must_use]
    pub fn already_compatible_count(&self) -> usize {
        self.already_compatible().count()
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }
}

/// Find mod archives directly inside a directory
///
/// # Arguments
/// * `dir` - Directory to scan (not recursive)
/// * `extensions` - Recognized archive extensions, without the dot
///
/// # Returns
/// A sorted list of archive paths.
pub fn find_mod_archives<P: AsRef<Path>, S: AsRef<str>>(dir: P, extensions: &[S]) -> Vec<PathBuf> {
    let mut archives: Vec<_> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.path().is_file() && has_archive_extension(e.path(), extensions))
        .map(|e| e.path().to_path_buf())
        .collect();

    archives.sort();
    archives
}

/// Patch a list of archives
///
/// Each archive is processed independently; a failing archive does not stop
/// the others. With `parallel`, archives are spread over the rayon pool; the
/// report keeps input order either way.
///
/// Output files are named after the input's base name, so an archive whose
/// base name already appeared earlier in `archives` is not processed and
/// ends as an `Error` outcome instead of overwriting the first one's output.
///
/// # Arguments
/// * `patcher` - Configured patcher (output directory, log)
/// * `archives` - Archives to patch
/// * `target_version` - Version written into `depends.minecraft`
/// * `parallel` - Process archives concurrently
/// * `progress` - Callback receiving per-archive phases; `current`/`total`
///   count archives
pub fn batch_patch<F>(
    patcher: &ModPatcher,
    archives: &[PathBuf],
    target_version: &str,
    parallel: bool,
    progress: F,
) -> BatchReport
where
    F: Fn(&PatchProgress) + Send + Sync,
{
    let total = archives.len();
    tracing::info!("Patching {total} archives to Minecraft {target_version}");

    let first_with_name = earlier_same_name(archives);

    let patch_one = |index: usize, archive: &PathBuf| {
        let current = index + 1;
        let name = archive
            .file_name()
            .map_or_else(|| archive.display().to_string(), |n| n.to_string_lossy().to_string());
        let forward = |p: &PatchProgress| {
            progress(&PatchProgress::with_file(p.phase, current, total, name.clone()));
        };

        if let Some(first) = first_with_name[index] {
            let message = format!(
                "output name collides with {}",
                archives[first].display()
            );
            return patcher.reject(archive, ErrorKind::WriteFailure, message, &forward);
        }
        patcher.patch_with_progress(archive, target_version, &forward)
    };

    let outcomes: Vec<PatchOutcome> = if parallel {
        archives
            .par_iter()
            .enumerate()
            .map(|(i, archive)| patch_one(i, archive))
            .collect()
    } else {
        archives
            .iter()
            .enumerate()
            .map(|(i, archive)| patch_one(i, archive))
            .collect()
    };

    patcher.log().append(COMPLETION_MESSAGE);
    BatchReport { outcomes }
}

/// For each archive, the index of an earlier archive with the same base name.
fn earlier_same_name(archives: &[PathBuf]) -> Vec<Option<usize>> {
    let mut seen: HashMap<&OsStr, usize> = HashMap::new();
    archives
        .iter()
        .enumerate()
        .map(|(i, archive)| {
            let name = archive.file_name()?;
            match seen.get(name) {
                Some(&first) => Some(first),
                None => {
                    seen.insert(name, i);
                    None
                }
            }
        })
        .collect()
}
