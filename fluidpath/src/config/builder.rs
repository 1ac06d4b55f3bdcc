//! Layered configuration assembly.

use std::env;
use std::path::{Path, PathBuf};

use crate::config::environment::EnvironmentConfig;
use crate::config::loader::ConfigLoader;
use crate::config::schema::WalkConfig;
use crate::error::{Error, Result};

/// Builds a [`WalkConfig`] from defaults, files, environment and overrides.
///
/// Precedence, highest first:
///
/// 1. Programmatic overrides ([`with_config`](Self::with_config))
/// 2. `FLUIDPATH_*` environment variables
/// 3. The nearest `.fluidpath.yaml` above the working directory
/// 4. Built-in defaults
///
/// # Examples
///
/// ```
/// use fluidpath::config::{ConfigBuilder, WalkConfig};
///
/// let config = ConfigBuilder::new()
///     .skip_files()
///     .skip_env()
///     .with_config(WalkConfig { max_depth: Some(2), ..Default::default() })
///     .build()
///     .unwrap();
/// assert_eq!(config.max_depth, Some(2));
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    working_dir: Option<PathBuf>,
    skip_files: bool,
    skip_env: bool,
    overrides: Option<WalkConfig>,
}

impl ConfigBuilder {
    /// A builder that reads files and environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory to start file discovery from. Defaults to the process
    /// working directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: &Path) -> Self {
        self.working_dir = Some(dir.to_path_buf());
        self
    }

    /// Do not read configuration files.
    #[must_use]
    pub fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Do not read environment variables.
    #[must_use]
    pub fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Apply `config` on top of everything else.
    #[must_use]
    pub fn with_config(mut self, config: WalkConfig) -> Self {
        self.overrides = Some(config);
        self
    }

    /// Assemble the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is unreadable or invalid, or
    /// an environment variable holds an invalid value.
    pub fn build(self) -> Result<WalkConfig> {
        let mut config = WalkConfig::default();

        if !self.skip_files {
            let working_dir = match self.working_dir {
                Some(dir) => dir,
                None => env::current_dir()
                    .map_err(|e| Error::from_io("current_dir", Path::new("."), e))?,
            };
            if let Some(source) = ConfigLoader::discover(&working_dir)? {
                config.merge(source.config);
            }
        }

        if !self.skip_env {
            EnvironmentConfig::apply_overrides(&mut config)?;
        }

        if let Some(overrides) = self.overrides {
            config.merge(overrides);
        }

        Ok(config)
    }
}
