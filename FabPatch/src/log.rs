//! Append-only patch log
//!
//! Every significant event of a run (start, success, warning, error,
//! completion) is appended as one line. The orchestrator only sees the
//! [`PatchLog`] trait; the CLI wires in a [`FileLog`].

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::Result;

/// Default log file name inside the output directory.
pub const DEFAULT_LOG_FILE: &str = "patchlog.txt";

/// Timestamp layout for log lines.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Append-only sink for patch events.
///
/// Implementations must serialize concurrent appends so lines never interleave.
pub trait PatchLog: Send + Sync {
    /// Append one event.
    fn append(&self, message: &str);
}

/// Format a log line as `<timestamp> - <message>`.
#[must_use]
pub fn format_line(message: &str) -> String {
    format!("{} - {message}", chrono::Local::now().format(TIMESTAMP_FORMAT))
}

/// Log backed by a text file opened in append mode.
#[derive(Debug)]
pub struct FileLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileLog {
    /// Open (or create) the log file for appending.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PatchLog for FileLog {
    fn append(&self, message: &str) {
        let line = format_line(message);
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        let written = writeln!(file, "{line}").and_then(|()| file.flush());
        if let Err(e) = written {
            tracing::warn!("Failed to append to {}: {}", self.path.display(), e);
        }
    }
}

/// In-memory log, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages appended so far, without timestamps.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PatchLog for MemoryLog {
    fn append(&self, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_log_appends_lines() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_LOG_FILE);

        let log = FileLog::open(&path).unwrap();
        log.append("Starting patch for a.jar...");
        log.append("Patching completed.");
        drop(log);

        // Reopening appends rather than truncating
        let log = FileLog::open(&path).unwrap();
        log.append("second run");

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with(" - Starting patch for a.jar..."));
        assert!(lines[2].ends_with(" - second run"));
    }

    #[test]
    fn test_format_line_shape() {
        let line = format_line("hello");
        let (stamp, message) = line.split_once(" - ").unwrap();
        assert_eq!(message, "hello");
        assert!(chrono::NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_file_log_concurrent_appends() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_LOG_FILE);
        let log = FileLog::open(&path).unwrap();

        std::thread::scope(|s| {
            for t in 0..4 {
                let log = &log;
                s.spawn(move || {
                    for i in 0..50 {
                        log.append(&format!("thread {t} line {i}"));
                    }
                });
            }
        });

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 200);
        assert!(text.lines().all(|l| l.contains(" - thread ")));
    }

    #[test]
    fn test_memory_log() {
        let log = MemoryLog::new();
        log.append("one");
        log.append("two");
        assert_eq!(log.messages(), vec!["one".to_string(), "two".to_string()]);
    }
}
