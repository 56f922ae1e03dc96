//! # FabPatch
//!
//! Retarget Minecraft Fabric mod archives to a new game version.
//!
//! For each `.jar`, FabPatch extracts the archive, rewrites the
//! `depends.minecraft` constraint in `fabric.mod.json` to the target version,
//! tags the mod name with `[PATCHED] `, and repacks everything else
//! byte-for-byte. Mods without a Minecraft dependency are copied through
//! untouched.
//!
//! ## Quick Start
//!
//! ### Patching a Single Archive
//!
//! ```no_run
//! use fabpatch::prelude::*;
//!
//! let log = FileLog::open("ready/patchlog.txt")?;
//! let patcher = ModPatcher::new("ready", &log);
//!
//! match patcher.patch("CoolMod.jar", "1.21.3") {
//!     PatchOutcome::Patched { output, .. } => println!("wrote {}", output.display()),
//!     other => println!("{other}"),
//! }
//! # Ok::<(), fabpatch::Error>(())
//! ```
//!
//! ### Batch Runs
//!
//! ```no_run
//! use fabpatch::prelude::*;
//!
//! let config = PatcherConfig::default();
//! let log = MemoryLog::new();
//! let patcher = ModPatcher::from_config(&config, &log);
//!
//! let archives = find_mod_archives(".", &config.extensions);
//! let report = batch_patch(&patcher, &archives, "1.21.3", false, |_| {});
//! println!("{} patched, {} failed", report.patched_count(), report.error_count());
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `fabpatch` command-line binary

pub mod archive;
pub mod batch;
pub mod config;
pub mod error;
pub mod log;
pub mod manifest;
pub mod patch;

// Re-exports for convenience
pub use error::{Error, ErrorKind, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, ErrorKind, Result};

    pub use crate::archive::{ScratchTree, extract, list_entries, repack};
    pub use crate::manifest::{
        MANIFEST_PATH, ModManifest, PATCHED_MARKER, PatchResult, PatchWarning,
        apply_version_patch,
    };
    pub use crate::patch::{ModPatcher, PatchOutcome, PatchPhase, PatchProgress};
    pub use crate::batch::{BatchReport, batch_patch, find_mod_archives};
    pub use crate::config::PatcherConfig;
    pub use crate::log::{FileLog, MemoryLog, PatchLog};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
