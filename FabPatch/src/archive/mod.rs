//! Zip archive handling for mod jars
//!
//! Archives are extracted into a [`ScratchTree`], a temporary directory that is
//! removed when dropped, and rebuilt from a directory tree with [`repack`].

mod scratch;
mod writer;

pub use scratch::{ScratchTree, extract, list_entries};
pub use writer::{repack, repack_dir};

use std::path::Path;

/// Extensions recognized as mod archives when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["jar"];

/// Check whether a path carries one of the given archive extensions.
///
/// Comparison is case-insensitive; `extensions` are given without the dot.
pub fn has_archive_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|known| known.as_ref().trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
}

/// Normalize path separators to forward slashes (zip entry names)
pub(crate) fn normalize_entry_name<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_archive_extension() {
        assert!(has_archive_extension(Path::new("mods/cool.jar"), DEFAULT_EXTENSIONS));
        assert!(has_archive_extension(Path::new("COOL.JAR"), DEFAULT_EXTENSIONS));
        assert!(has_archive_extension(Path::new("cool.zip"), &[".zip"]));
        assert!(!has_archive_extension(Path::new("cool.jar.txt"), DEFAULT_EXTENSIONS));
        assert!(!has_archive_extension(Path::new("jar"), DEFAULT_EXTENSIONS));
    }

    #[test]
    fn test_normalize_entry_name() {
        assert_eq!(normalize_entry_name("assets\\mod\\icon.png"), "assets/mod/icon.png");
        assert_eq!(normalize_entry_name("fabric.mod.json"), "fabric.mod.json");
    }
}
