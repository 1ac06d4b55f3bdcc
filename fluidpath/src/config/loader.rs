//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::schema::WalkConfig;
use crate::error::{Error, Result};

/// File name searched for by [`ConfigLoader::discover`].
pub const CONFIG_FILE_NAME: &str = ".fluidpath.yaml";

/// A loaded configuration file.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Where the configuration came from.
    pub path: PathBuf,
    /// Parsed configuration.
    pub config: WalkConfig,
}

/// Loads configuration files.
///
/// # Examples
///
/// ```no_run
/// use fluidpath::config::ConfigLoader;
/// use std::path::Path;
///
/// if let Some(source) = ConfigLoader::discover(Path::new(".")).unwrap() {
///     println!("Using {}", source.path.display());
/// }
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Walk up from `start_dir` and load the first `.fluidpath.yaml` found.
    ///
    /// # Errors
    ///
    /// Returns an error if a discovered file cannot be read or parsed.
    pub fn discover(start_dir: &Path) -> Result<Option<ConfigSource>> {
        let mut current = start_dir.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                debug!("Loading configuration from {}", candidate.display());
                let config = Self::load_file(&candidate)?;
                return Ok(Some(ConfigSource {
                    path: candidate,
                    config,
                }));
            }
            if !current.pop() {
                return Ok(None);
            }
        }
    }

    /// Read one YAML file.
    ///
    /// # Errors
    ///
    /// [`Error::PathNotFound`] (or another I/O error) if the file can't be
    /// read, [`Error::Configuration`] if it doesn't parse as a [`WalkConfig`].
    pub fn load_file(path: &Path) -> Result<WalkConfig> {
        let contents =
            fs::read_to_string(path).map_err(|e| Error::from_io("read_config", path, e))?;
        if contents.trim().is_empty() {
            return Ok(WalkConfig::default());
        }
        Ok(serde_yaml::from_str(&contents)?)
    }
}
