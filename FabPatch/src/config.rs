//! Patcher configuration (`fabpatch.toml`)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::archive::DEFAULT_EXTENSIONS;
use crate::error::{Error, Result};
use crate::log::DEFAULT_LOG_FILE;

/// Config file name looked up in the working directory and the platform config dir.
pub const CONFIG_FILE_NAME: &str = "fabpatch.toml";

fn default_output_dir() -> PathBuf {
    PathBuf::from("ready")
}

fn default_log_file() -> String {
    DEFAULT_LOG_FILE.to_string()
}

fn default_target_version() -> String {
    "1.21.3".to_string()
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect()
}

/// Settings for a patch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatcherConfig {
    /// Directory receiving patched archives, copied archives and the log.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Log file name inside `output_dir`.
    #[serde(default = "default_log_file")]
    pub log_file: String,
    /// Version offered when the user does not name one.
    #[serde(default = "default_target_version")]
    pub default_target_version: String,
    /// Recognized archive extensions, without the dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Patch archives in parallel.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for PatcherConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            log_file: default_log_file(),
            default_target_version: default_target_version(),
            extensions: default_extensions(),
            parallel: false,
        }
    }
}

impl PatcherConfig {
    /// Parse a config from TOML text. Missing keys take their defaults.
    pub fn from_toml(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Read a config file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    ///
    /// [`Error::Config`]: crate::Error::Config
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&text).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Resolve the configuration for a run.
    ///
    /// An explicit path must exist. Otherwise `./fabpatch.toml` and then
    /// `<config dir>/fabpatch/fabpatch.toml` are tried, falling back to
    /// defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        for candidate in Self::search_paths() {
            if candidate.is_file() {
                tracing::debug!("Using config {}", candidate.display());
                return Self::load_from(candidate);
            }
        }

        Ok(Self::default())
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("fabpatch").join(CONFIG_FILE_NAME));
        }
        paths
    }

    /// Full path of the patch log.
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.output_dir.join(&self.log_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = PatcherConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("ready"));
        assert_eq!(config.log_path(), PathBuf::from("ready").join("patchlog.txt"));
        assert_eq!(config.default_target_version, "1.21.3");
        assert_eq!(config.extensions, vec!["jar".to_string()]);
        assert!(!config.parallel);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = PatcherConfig::from_toml("default_target_version = \"1.20.6\"\nparallel = true\n")
            .unwrap();
        assert_eq!(config.default_target_version, "1.20.6");
        assert!(config.parallel);
        assert_eq!(config.output_dir, PathBuf::from("ready"));
    }

    #[test]
    fn test_roundtrip() {
        let config = PatcherConfig {
            output_dir: PathBuf::from("out"),
            extensions: vec!["jar".to_string(), "zip".to_string()],
            ..PatcherConfig::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(PatcherConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.toml");
        let err = PatcherConfig::discover(Some(missing.as_path())).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert_eq!(err.kind(), ErrorKind::Other);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "parallel = \"sometimes\"").unwrap();
        assert!(matches!(PatcherConfig::load_from(&path), Err(Error::Config { .. })));
    }
}
