//! Rebuilding archives from directory trees

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{ScratchTree, normalize_entry_name};
use crate::error::{Error, Result};

/// Entries at or above this size need zip64 headers.
const ZIP64_THRESHOLD: u64 = 0xFFFF_FFFF;

/// Repack a scratch tree into a new archive at `output_path`.
///
/// See [`repack_dir`].
pub fn repack<P: AsRef<Path>>(tree: &ScratchTree, output_path: P) -> Result<usize> {
    repack_dir(tree.path(), output_path)
}

/// Write every regular file under `root` into a new zip at `output_path`.
///
/// Files are visited depth-first in file-name order and stored under their
/// path relative to `root`, with `/` separators. Directory entries are not
/// written. An existing file at `output_path` is overwritten; on failure the
/// partial output is removed.
///
/// Returns the number of entries written.
///
/// # Errors
///
/// Returns [`Error::WriteFailure`] if the tree cannot be read or the archive
/// cannot be written.
///
/// [`Error::WriteFailure`]: crate::Error::WriteFailure
pub fn repack_dir<R: AsRef<Path>, O: AsRef<Path>>(root: R, output_path: O) -> Result<usize> {
    let root = root.as_ref();
    let output_path = output_path.as_ref();

    match write_archive(root, output_path) {
        Ok(count) => {
            tracing::debug!("Wrote {count} entries to {}", output_path.display());
            Ok(count)
        }
        Err(e) => {
            if output_path.exists() {
                if let Err(remove_err) = fs::remove_file(output_path) {
                    tracing::warn!(
                        "Failed to remove partial archive {}: {remove_err}",
                        output_path.display()
                    );
                }
            }
            Err(Error::write_failure(output_path, e))
        }
    }
}

fn write_archive(root: &Path, output_path: &Path) -> Result<usize> {
    let file = File::create(output_path)?;
    let mut writer = ZipWriter::new(BufWriter::new(file));

    let mut count = 0;
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path
            .strip_prefix(root)
            .map_err(|e| Error::write_failure(path, e))?;
        let name = normalize_entry_name(relative);

        let size = entry.metadata()?.len();
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .large_file(size >= ZIP64_THRESHOLD);

        writer.start_file(name, options)?;
        let mut source = BufReader::new(File::open(path)?);
        std::io::copy(&mut source, &mut writer)?;
        count += 1;
    }

    let mut inner = writer.finish()?;
    inner.flush()?;
    Ok(count)
}
