//! Manifest load / patch / save rules

use std::fmt;
use std::fs;

use serde_json::Value;

use super::{MANIFEST_PATH, ModManifest, PATCHED_MARKER};
use crate::archive::ScratchTree;
use crate::error::{Error, Result};

/// Non-fatal issue found while patching a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchWarning {
    /// The manifest declares no `name`, so no marker was added.
    NameFieldMissing,
}

impl fmt::Display for PatchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameFieldMissing => write!(f, "'name' field not found in {MANIFEST_PATH}"),
        }
    }
}

/// Result of applying the version patch to a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchResult {
    /// No `depends.minecraft` constraint; the manifest was left untouched.
    NoOpAlreadyCompatible,
    /// The constraint was rewritten.
    Patched {
        /// Set when the name could not be tagged.
        warning: Option<PatchWarning>,
    },
}

/// Load the manifest from the root of an extracted archive.
///
/// # Errors
///
/// Returns [`Error::ManifestMissing`] if there is no `fabric.mod.json` at the
/// tree root and [`Error::ManifestMalformed`] if it cannot be parsed.
///
/// [`Error::ManifestMissing`]: crate::Error::ManifestMissing
/// [`Error::ManifestMalformed`]: crate::Error::ManifestMalformed
pub fn load(tree: &ScratchTree) -> Result<ModManifest> {
    let path = tree.join(MANIFEST_PATH);
    if !path.is_file() {
        return Err(Error::ManifestMissing);
    }

    let bytes = fs::read(&path)?;
    let text = String::from_utf8(bytes)
        .map_err(|e| Error::ManifestMalformed(format!("not valid UTF-8: {e}")))?;
    ModManifest::parse(&text)
}

/// Retarget the manifest to `target_version`.
///
/// If the manifest declares `depends.minecraft`, it is replaced by
/// `target_version` verbatim and the display name gets the
/// [`PATCHED_MARKER`] prefix (once). Otherwise nothing changes and the rest
/// of the document is never inspected.
///
/// # Errors
///
/// Returns [`Error::ManifestMalformed`] if a Minecraft dependency is declared
/// and `name` is present but not a string. The manifest is left untouched.
///
/// [`Error::ManifestMalformed`]: crate::Error::ManifestMalformed
pub fn apply_version_patch(manifest: &mut ModManifest, target_version: &str) -> Result<PatchResult> {
    if manifest.minecraft_dependency().is_none() {
        return Ok(PatchResult::NoOpAlreadyCompatible);
    }

    let tagged = match manifest.name_value() {
        None => None,
        Some(Value::String(name)) if name.starts_with(PATCHED_MARKER) => None,
        Some(Value::String(name)) => Some(format!("{PATCHED_MARKER}{name}")),
        Some(_) => return Err(Error::ManifestMalformed("'name' is not a string".to_string())),
    };
    let warning = manifest
        .name_value()
        .is_none()
        .then_some(PatchWarning::NameFieldMissing);

    manifest.set_minecraft_dependency(target_version);
    if let Some(name) = tagged {
        manifest.set_name(name);
    }

    Ok(PatchResult::Patched { warning })
}

/// Write the manifest back to the root of the tree.
///
/// # Errors
///
/// Returns [`Error::WriteFailure`] if the file cannot be written.
///
/// [`Error::WriteFailure`]: crate::Error::WriteFailure
pub fn save(manifest: &ModManifest, tree: &ScratchTree) -> Result<()> {
    let path = tree.join(MANIFEST_PATH);
    let text = manifest
        .to_pretty_string()
        .map_err(|e| Error::write_failure(&path, e))?;
    fs::write(&path, text).map_err(|e| Error::write_failure(&path, e))
}
