//! Archive extraction into scoped scratch trees

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::ZipArchive;

use crate::error::{Error, Result};

/// A temporary, extracted copy of an archive's contents.
///
/// The directory is deleted when the tree is dropped, whether processing
/// succeeded or not.
#[derive(Debug)]
pub struct ScratchTree {
    dir: TempDir,
    entries: usize,
}

impl ScratchTree {
    /// Create an empty scratch tree.
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("fabpatch-").tempdir()?;
        Ok(Self { dir, entries: 0 })
    }

    /// Root of the extracted tree.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Resolve a path relative to the tree root.
    #[must_use]
    pub fn join<P: AsRef<Path>>(&self, relative: P) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Number of file entries written during extraction.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries
    }
}

fn open_archive(archive_path: &Path) -> Result<ZipArchive<BufReader<File>>> {
    let metadata = fs::metadata(archive_path)
        .map_err(|e| Error::invalid_archive(archive_path, e))?;
    if !metadata.is_file() {
        return Err(Error::invalid_archive(archive_path, "not a regular file"));
    }

    let file = File::open(archive_path).map_err(|e| Error::invalid_archive(archive_path, e))?;
    ZipArchive::new(BufReader::new(file)).map_err(|e| Error::invalid_archive(archive_path, e))
}

/// Extract every entry of a zip archive into a fresh [`ScratchTree`].
///
/// # Errors
///
/// Returns [`Error::InvalidArchive`] if the path does not exist, is not a
/// regular file, is not a zip container, or holds an entry whose name would
/// escape the scratch root. Returns [`Error::Io`] if writing the scratch tree
/// fails.
///
/// [`Error::InvalidArchive`]: crate::Error::InvalidArchive
/// [`Error::Io`]: crate::Error::Io
pub fn extract<P: AsRef<Path>>(archive_path: P) -> Result<ScratchTree> {
    let archive_path = archive_path.as_ref();
    let mut archive = open_archive(archive_path)?;
    let mut tree = ScratchTree::new()?;

    tracing::debug!(
        "Extracting {} entries from {} into {}",
        archive.len(),
        archive_path.display(),
        tree.path().display()
    );

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| Error::invalid_archive(archive_path, e))?;

        let Some(relative) = entry.enclosed_name() else {
            return Err(Error::invalid_archive(
                archive_path,
                format!("unsafe entry path '{}'", entry.name()),
            ));
        };
        let output_path = tree.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&output_path)?;
            continue;
        }

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let name = entry.name().to_string();
        let mut outfile = File::create(&output_path)?;
        std::io::copy(&mut entry, &mut outfile)
            .map_err(|e| Error::invalid_archive(archive_path, format!("{name}: {e}")))?;
        tree.entries += 1;
    }

    Ok(tree)
}

/// List the file entry names of an archive, in archive order.
///
/// Directory entries are skipped.
pub fn list_entries<P: AsRef<Path>>(archive_path: P) -> Result<Vec<String>> {
    let archive_path = archive_path.as_ref();
    let mut archive = open_archive(archive_path)?;

    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive
            .by_index_raw(i)
            .map_err(|e| Error::invalid_archive(archive_path, e))?;
        if !entry.is_dir() {
            names.push(entry.name().to_string());
        }
    }
    Ok(names)
}
