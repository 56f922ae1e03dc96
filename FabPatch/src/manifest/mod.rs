//! Fabric mod manifest (`fabric.mod.json`) handling
//!
//! This module provides tools for working with the mod descriptor:
//! - Load and validate the manifest from an extracted archive
//! - Retarget the `depends.minecraft` constraint and tag the display name
//! - Write the manifest back, keeping every unrecognized key in place

mod document;
mod patcher;

pub use document::ModManifest;
pub use patcher::{PatchResult, PatchWarning, apply_version_patch, load, save};

/// Path of the manifest relative to the archive root.
pub const MANIFEST_PATH: &str = "fabric.mod.json";

/// Marker prepended to the display name of patched mods.
pub const PATCHED_MARKER: &str = "[PATCHED] ";
