//! Creating directories and files.

use std::fs::{self, OpenOptions};

use filetime::FileTime;
use log::debug;

use crate::error::{Error, Result};
use crate::path::{probe, PhysicalType, SemanticPath, SemanticType};

impl SemanticPath {
    /// Create a directory at this path.
    ///
    /// Returns the path tagged as a directory.
    ///
    /// # Errors
    ///
    /// - [`Error::WrongType`] if something other than a directory is there.
    /// - [`Error::AlreadyExists`] if a directory is there and `!exist_ok`.
    /// - [`Error::PathNotFound`] if the parent is missing and `!parents`.
    pub fn create_directory(&self, parents: bool, exist_ok: bool) -> Result<Self> {
        let path = self.as_path();
        match probe(path, true)? {
            PhysicalType::DoesNotExist => {}
            PhysicalType::Directory if exist_ok => {
                return Ok(self.with_semantic_type(SemanticType::Directory));
            }
            PhysicalType::Directory => {
                return Err(Error::AlreadyExists {
                    path: path.to_path_buf(),
                });
            }
            found => {
                return Err(Error::WrongType {
                    path: path.to_path_buf(),
                    expected: SemanticType::Directory,
                    found,
                });
            }
        }

        let result = if parents {
            fs::create_dir_all(path)
        } else {
            fs::create_dir(path)
        };
        result.map_err(|e| Error::from_io("create_directory", path, e))?;
        debug!("Created directory {}", path.display());
        Ok(self.with_semantic_type(SemanticType::Directory))
    }

    /// Create an empty file, or refresh the modification time of an existing
    /// one.
    ///
    /// Returns the path tagged as a file.
    ///
    /// # Errors
    ///
    /// - [`Error::WrongType`] if a directory is there.
    /// - [`Error::AlreadyExists`] if a file is there and `!exist_ok`.
    /// - [`Error::PathNotFound`] if the parent directory is missing.
    pub fn create_file(&self, exist_ok: bool) -> Result<Self> {
        let path = self.as_path();
        match probe(path, true)? {
            PhysicalType::DoesNotExist => {
                OpenOptions::new()
                    .write(true)
                    .create_new(true)
                    .open(path)
                    .map_err(|e| Error::from_io("create_file", path, e))?;
                debug!("Created file {}", path.display());
            }
            PhysicalType::Directory => {
                return Err(Error::WrongType {
                    path: path.to_path_buf(),
                    expected: SemanticType::File,
                    found: PhysicalType::Directory,
                });
            }
            _ if exist_ok => {
                filetime::set_file_mtime(path, FileTime::now())
                    .map_err(|e| Error::from_io("touch", path, e))?;
            }
            _ => {
                return Err(Error::AlreadyExists {
                    path: path.to_path_buf(),
                });
            }
        }
        Ok(self.with_semantic_type(SemanticType::File))
    }
}
