//! Patch orchestration for mod archives

mod patcher;
pub mod types;

pub use patcher::{ModPatcher, PATCHED_PREFIX, patched_file_name};
pub use types::{PatchOutcome, PatchPhase, PatchProgress, PatchProgressCallback};
