//! Reading and writing file content.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use log::debug;

use super::WriteMode;
use crate::error::{Error, Result};
use crate::path::SemanticPath;

impl SemanticPath {
    /// Read the whole file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// The wrapped OS error, including invalid UTF-8.
    pub fn read_text(&self) -> Result<String> {
        fs::read_to_string(self.as_path()).map_err(|e| Error::from_io("read", self.as_path(), e))
    }

    /// Read the whole file as bytes.
    ///
    /// # Errors
    ///
    /// The wrapped OS error.
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        fs::read(self.as_path()).map_err(|e| Error::from_io("read", self.as_path(), e))
    }

    /// Read the file as lines, without line terminators.
    ///
    /// # Errors
    ///
    /// The wrapped OS error.
    pub fn read_lines(&self) -> Result<Vec<String>> {
        Ok(self.read_text()?.lines().map(str::to_string).collect())
    }

    /// Write text.
    ///
    /// # Errors
    ///
    /// The wrapped OS error.
    pub fn write_text(&self, data: &str, mode: WriteMode) -> Result<()> {
        self.write_bytes(data.as_bytes(), mode)
    }

    /// Write bytes, truncating or appending.
    ///
    /// # Errors
    ///
    /// The wrapped OS error.
    pub fn write_bytes(&self, data: &[u8], mode: WriteMode) -> Result<()> {
        let path = self.as_path();
        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            WriteMode::Truncate => options.write(true).truncate(true),
            WriteMode::Append => options.append(true),
        };
        let mut file = options
            .open(path)
            .map_err(|e| Error::from_io("write", path, e))?;
        file.write_all(data)
            .map_err(|e| Error::from_io("write", path, e))
    }

    /// Write each line followed by a newline.
    ///
    /// # Errors
    ///
    /// The wrapped OS error.
    pub fn write_lines<I, S>(&self, lines: I, mode: WriteMode) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for line in lines {
            text.push_str(line.as_ref());
            text.push('\n');
        }
        self.write_text(&text, mode)
    }

    /// Replace the file's content atomically.
    ///
    /// The text is written to a temporary sibling which is then renamed over
    /// this path. Readers see either the old or the new content, never a
    /// partial write.
    ///
    /// # Errors
    ///
    /// The wrapped OS error. On failure the original file is untouched and the
    /// temporary sibling is removed.
    pub fn write_text_atomic(&self, data: &str) -> Result<()> {
        self.write_bytes_atomic(data.as_bytes())
    }

    /// Byte counterpart of [`write_text_atomic`](Self::write_text_atomic).
    ///
    /// # Errors
    ///
    /// See [`write_text_atomic`](Self::write_text_atomic).
    pub fn write_bytes_atomic(&self, data: &[u8]) -> Result<()> {
        self.write_atomic_with(data, |from, to| fs::rename(from, to))
    }

    pub(crate) fn write_atomic_with<F>(&self, data: &[u8], replace: F) -> Result<()>
    where
        F: FnOnce(&Path, &Path) -> io::Result<()>,
    {
        let target = self.as_path();
        let parent = self.parent();
        let name = self.name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();

        let mut temp = tempfile::Builder::new()
            .prefix(&format!(".{name}."))
            .suffix(".tmp")
            .tempfile_in(parent.as_path())
            .map_err(|e| Error::from_io("write_atomic", target, e))?;
        temp.write_all(data)
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|e| Error::from_io("write_atomic", target, e))?;

        // Dropping the TempPath on any early return removes the sibling.
        let temp_path = temp.into_temp_path();
        replace(&temp_path, target).map_err(|e| Error::from_io("write_atomic", target, e))?;

        if let Err(e) = temp_path.keep() {
            debug!("Temporary file already renamed: {e}");
        }
        Ok(())
    }
}
