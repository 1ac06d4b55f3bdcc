//! Copying, moving, renaming and linking.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use glob::Pattern;
use log::debug;

use super::CopyOptions;
use crate::error::{Error, Result};
use crate::path::{probe, PhysicalType, SemanticPath, SemanticType};
use crate::platform;

impl SemanticPath {
    /// Copy this file or directory tree to `to`.
    ///
    /// A file copied onto an existing directory lands inside it under its
    /// own name. A directory is copied to exactly `to`.
    ///
    /// # Errors
    ///
    /// - [`Error::PathNotFound`] if the source is missing.
    /// - [`Error::AlreadyExists`] if the destination directory exists and
    ///   `dirs_exist_ok` is not set.
    /// - [`Error::InvalidPattern`] for a bad ignore glob.
    pub fn copy(&self, to: impl AsRef<Path>, options: &CopyOptions) -> Result<Self> {
        let source = self.as_path();
        let to = to.as_ref();
        let ignore = compile_ignore(&options.ignore)?;

        match probe(source, options.follow_symlinks)? {
            PhysicalType::DoesNotExist => Err(Error::PathNotFound {
                path: source.to_path_buf(),
                operation: "copy",
            }),
            PhysicalType::Directory => {
                if probe(to, false)?.exists() && !options.dirs_exist_ok {
                    return Err(Error::AlreadyExists {
                        path: to.to_path_buf(),
                    });
                }
                copy_tree(source, to, options, &ignore)?;
                Ok(Self::from_parts(to, SemanticType::Directory))
            }
            PhysicalType::Symlink => {
                let dest = destination_for(source, to)?;
                recreate_link(source, &dest)?;
                Ok(Self::from_parts(dest, self.semantic_type()))
            }
            _ => {
                let dest = destination_for(source, to)?;
                copy_file(source, &dest, options.metadata)?;
                Ok(Self::from_parts(dest, SemanticType::File))
            }
        }
    }

    /// Move this path to `to`, or into `to` if it is an existing directory.
    ///
    /// Falls back to copy-then-delete when a plain rename crosses devices.
    /// `metadata` decides whether that copy keeps permissions and timestamps.
    ///
    /// # Errors
    ///
    /// The wrapped OS error from the rename or the fallback.
    pub fn move_to(&self, to: impl AsRef<Path>, metadata: bool) -> Result<Self> {
        let source = self.as_path();
        let to = to.as_ref();
        let dest = if probe(to, true)? == PhysicalType::Directory {
            destination_for(source, to)?
        } else {
            to.to_path_buf()
        };

        match fs::rename(source, &dest) {
            Ok(()) => {}
            Err(e) if is_cross_device(&e) => {
                debug!("Moving {} across devices by copying", source.display());
                self.move_by_copy(&dest, metadata)?;
            }
            Err(e) => return Err(Error::from_io("move", source, e)),
        }
        Ok(Self::from_parts(dest, self.semantic_type()))
    }

    fn move_by_copy(&self, dest: &Path, metadata: bool) -> Result<()> {
        let options = CopyOptions::new()
            .with_follow_symlinks(false)
            .with_maintain_symlinks(true)
            .with_metadata(metadata);
        self.copy(dest, &options)?;
        self.delete(true, false)
    }

    /// Rename to `to`, refusing to overwrite.
    ///
    /// The returned path keeps this path's semantic type.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyExists`] if anything is at `to`; otherwise the wrapped
    /// OS error.
    pub fn rename(&self, to: impl AsRef<Path>) -> Result<Self> {
        let to = to.as_ref();
        if probe(to, false)?.exists() {
            return Err(Error::AlreadyExists {
                path: to.to_path_buf(),
            });
        }
        self.replace(to)
    }

    /// Rename to `to`, overwriting whatever is there.
    ///
    /// # Errors
    ///
    /// The wrapped OS error.
    pub fn replace(&self, to: impl AsRef<Path>) -> Result<Self> {
        let to = to.as_ref();
        fs::rename(self.as_path(), to).map_err(|e| Error::from_io("rename", self.as_path(), e))?;
        Ok(Self::from_parts(to, self.semantic_type()))
    }

    /// Make this path a symbolic link to `target`.
    ///
    /// A relative `target` is interpreted from this path's parent, as the OS
    /// does when following the link.
    ///
    /// # Errors
    ///
    /// The wrapped OS error, or [`Error::PlatformUnsupported`].
    pub fn symlink_to(&self, target: impl AsRef<Path>) -> Result<()> {
        let target = target.as_ref();
        let resolved = if target.is_absolute() {
            target.to_path_buf()
        } else {
            self.parent().as_path().join(target)
        };
        let target_is_dir = match probe(&resolved, true)? {
            PhysicalType::Directory => true,
            PhysicalType::DoesNotExist => SemanticType::infer(target).is_directory(),
            _ => false,
        };
        platform::native().symlink(target, self.as_path(), target_is_dir)
    }

    /// Make this path a hard link to `target`.
    ///
    /// # Errors
    ///
    /// The wrapped OS error.
    pub fn hardlink_to(&self, target: impl AsRef<Path>) -> Result<()> {
        fs::hard_link(target.as_ref(), self.as_path())
            .map_err(|e| Error::from_io("hard_link", self.as_path(), e))
    }
}

fn compile_ignore(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| Error::InvalidPattern {
                pattern: p.clone(),
                reason: e.to_string(),
            })
        })
        .collect()
}

/// `to/<name of source>` for directories, `to` otherwise.
fn destination_for(source: &Path, to: &Path) -> Result<PathBuf> {
    if probe(to, true)? != PhysicalType::Directory {
        return Ok(to.to_path_buf());
    }
    let name = source.file_name().ok_or_else(|| Error::InvalidPath {
        path: source.to_path_buf(),
        reason: "path has an empty name".to_string(),
    })?;
    Ok(to.join(name))
}

fn copy_file(source: &Path, dest: &Path, metadata: bool) -> Result<()> {
    fs::copy(source, dest).map_err(|e| Error::from_io("copy", source, e))?;
    if metadata {
        copy_times(source, dest)?;
    }
    Ok(())
}

fn copy_times(source: &Path, dest: &Path) -> Result<()> {
    let metadata = fs::metadata(source).map_err(|e| Error::from_io("stat", source, e))?;
    filetime::set_file_times(
        dest,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )
    .map_err(|e| Error::from_io("set_times", dest, e))
}

fn recreate_link(source: &Path, dest: &Path) -> Result<()> {
    let target = fs::read_link(source).map_err(|e| Error::from_io("read_link", source, e))?;
    let target_is_dir = probe(source, true)? == PhysicalType::Directory;
    platform::native().symlink(&target, dest, target_is_dir)
}

fn copy_tree(source: &Path, dest: &Path, options: &CopyOptions, ignore: &[Pattern]) -> Result<()> {
    // List before creating `dest`, which may live inside `source`.
    let entries = fs::read_dir(source)
        .and_then(Iterator::collect::<io::Result<Vec<_>>>)
        .map_err(|e| Error::from_io("copy", source, e))?;
    fs::create_dir_all(dest).map_err(|e| Error::from_io("copy", dest, e))?;

    for entry in entries {
        let name = entry.file_name();
        if ignore.iter().any(|p| p.matches(&name.to_string_lossy())) {
            debug!("Skipping ignored entry {}", entry.path().display());
            continue;
        }

        let from = entry.path();
        let to = dest.join(&name);
        let file_type = entry
            .file_type()
            .map_err(|e| Error::from_io("copy", &from, e))?;
        if file_type.is_symlink() && options.maintain_symlinks {
            recreate_link(&from, &to)?;
        } else if probe(&from, true)? == PhysicalType::Directory {
            copy_tree(&from, &to, options, ignore)?;
        } else {
            copy_file(&from, &to, options.metadata)?;
        }
    }

    if options.metadata {
        let permissions = fs::metadata(source)
            .map_err(|e| Error::from_io("stat", source, e))?
            .permissions();
        fs::set_permissions(dest, permissions).map_err(|e| Error::from_io("chmod", dest, e))?;
        copy_times(source, dest)?;
    }
    Ok(())
}

fn is_cross_device(err: &io::Error) -> bool {
    #[cfg(unix)]
    {
        err.raw_os_error() == Some(nix::errno::Errno::EXDEV as i32)
    }
    #[cfg(windows)]
    {
        // ERROR_NOT_SAME_DEVICE
        err.raw_os_error() == Some(17)
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = err;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tree() -> (TempDir, SemanticPath) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/nested")).unwrap();
        fs::write(dir.path().join("src/a.txt"), "alpha").unwrap();
        fs::write(dir.path().join("src/skip.pyc"), "bytecode").unwrap();
        fs::write(dir.path().join("src/nested/b.txt"), "beta").unwrap();
        fs::create_dir(dir.path().join("out")).unwrap();
        let root = SemanticPath::new(dir.path()).with_semantic_type(SemanticType::Directory);
        (dir, root)
    }

    #[test]
    fn test_copy_file_into_directory() {
        let (dir, root) = tree();
        let copied = (&root / "src/a.txt")
            .copy(dir.path().join("out"), &CopyOptions::new())
            .unwrap();
        assert_eq!(copied.as_path(), dir.path().join("out/a.txt"));
        assert_eq!(fs::read_to_string(copied.as_path()).unwrap(), "alpha");
    }

    #[test]
    fn test_copy_file_preserves_mtime() {
        let (dir, root) = tree();
        let past = FileTime::from_unix_time(1_000_000, 0);
        filetime::set_file_mtime(dir.path().join("src/a.txt"), past).unwrap();
        let copied = (&root / "src/a.txt")
            .copy(dir.path().join("copy.txt"), &CopyOptions::new())
            .unwrap();
        let metadata = fs::metadata(copied.as_path()).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&metadata), past);
    }

    #[test]
    fn test_copy_tree_with_ignore() {
        let (dir, root) = tree();
        let options = CopyOptions::new().with_ignore(["*.pyc"]);
        let copied = (&root / "src/").copy(dir.path().join("dst"), &options).unwrap();
        assert_eq!(copied.semantic_type(), SemanticType::Directory);
        assert!(dir.path().join("dst/a.txt").is_file());
        assert!(dir.path().join("dst/nested/b.txt").is_file());
        assert!(!dir.path().join("dst/skip.pyc").exists());
    }

    #[test]
    fn test_copy_tree_existing_destination() {
        let (dir, root) = tree();
        let src = &root / "src/";
        let err = src
            .copy(dir.path().join("out"), &CopyOptions::new())
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists { .. }));
        src.copy(
            dir.path().join("out"),
            &CopyOptions::new().with_dirs_exist_ok(true),
        )
        .unwrap();
        assert!(dir.path().join("out/nested/b.txt").is_file());
    }

    #[test]
    fn test_copy_missing_source() {
        let (dir, root) = tree();
        let err = (&root / "nope")
            .copy(dir.path().join("x"), &CopyOptions::new())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_copy_invalid_ignore_pattern() {
        let (dir, root) = tree();
        let options = CopyOptions::new().with_ignore(["[unclosed"]);
        let err = (&root / "src/").copy(dir.path().join("x"), &options).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }

    #[test]
    #[cfg(unix)]
    fn test_copy_symlink_without_following() {
        let (dir, root) = tree();
        std::os::unix::fs::symlink("src/a.txt", dir.path().join("link")).unwrap();
        let options = CopyOptions::new().with_follow_symlinks(false);
        let copied = (&root / "link").copy(dir.path().join("link2"), &options).unwrap();
        let meta = fs::symlink_metadata(copied.as_path()).unwrap();
        assert!(meta.file_type().is_symlink());
        assert_eq!(
            fs::read_link(copied.as_path()).unwrap(),
            PathBuf::from("src/a.txt")
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_copy_tree_maintains_symlinks() {
        let (dir, root) = tree();
        std::os::unix::fs::symlink("a.txt", dir.path().join("src/alias")).unwrap();
        let options = CopyOptions::new().with_maintain_symlinks(true);
        (&root / "src/").copy(dir.path().join("dst"), &options).unwrap();
        let meta = fs::symlink_metadata(dir.path().join("dst/alias")).unwrap();
        assert!(meta.file_type().is_symlink());

        let options = CopyOptions::new();
        (&root / "src/").copy(dir.path().join("dst2"), &options).unwrap();
        let meta = fs::symlink_metadata(dir.path().join("dst2/alias")).unwrap();
        assert!(meta.file_type().is_file());
    }

    #[test]
    fn test_move_into_directory() {
        let (dir, root) = tree();
        let moved = (&root / "src/a.txt")
            .move_to(dir.path().join("out"), true)
            .unwrap();
        assert_eq!(moved.as_path(), dir.path().join("out/a.txt"));
        assert!(!dir.path().join("src/a.txt").exists());
    }

    #[test]
    fn test_move_by_copy_metadata_flag() {
        let (dir, root) = tree();
        let past = FileTime::from_unix_time(1_000_000, 0);
        filetime::set_file_mtime(dir.path().join("src/a.txt"), past).unwrap();
        filetime::set_file_mtime(dir.path().join("src/nested/b.txt"), past).unwrap();
        let mtime = |p: PathBuf| {
            FileTime::from_last_modification_time(&fs::metadata(p).unwrap())
        };

        (&root / "src/a.txt")
            .move_by_copy(&dir.path().join("kept.txt"), true)
            .unwrap();
        assert!(!dir.path().join("src/a.txt").exists());
        assert_eq!(mtime(dir.path().join("kept.txt")), past);

        (&root / "src/nested/")
            .move_by_copy(&dir.path().join("fresh"), false)
            .unwrap();
        assert!(!dir.path().join("src/nested").exists());
        assert_eq!(fs::read_to_string(dir.path().join("fresh/b.txt")).unwrap(), "beta");
        assert_ne!(mtime(dir.path().join("fresh/b.txt")), past);
    }

    #[test]
    fn test_rename_refuses_overwrite() {
        let (dir, root) = tree();
        let a = &root / "src/a.txt";
        let err = a.rename(dir.path().join("src/nested/b.txt")).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists { .. }));

        let renamed = a.rename(dir.path().join("src/c.txt")).unwrap();
        assert_eq!(renamed.semantic_type(), SemanticType::File);
        assert!(dir.path().join("src/c.txt").exists());
    }

    #[test]
    fn test_replace_overwrites() {
        let (dir, root) = tree();
        let a = &root / "src/a.txt";
        a.replace(dir.path().join("src/nested/b.txt")).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("src/nested/b.txt")).unwrap(),
            "alpha"
        );
    }

    #[test]
    fn test_rename_keeps_directory_type() {
        let (dir, root) = tree();
        let renamed = (&root / "src/").rename(dir.path().join("moved")).unwrap();
        assert_eq!(renamed.semantic_type(), SemanticType::Directory);
    }

    #[test]
    #[cfg(unix)]
    fn test_symlink_to() {
        let (dir, root) = tree();
        let link = &root / "link-to-src";
        link.symlink_to("src").unwrap();
        assert_eq!(link.physical_type(), PhysicalType::Symlink);
        assert!(link.is_directory(true, true));
        assert_eq!(link.read_link().unwrap().as_path(), dir.path().join("src"));
    }

    #[test]
    fn test_hardlink_to() {
        let (dir, root) = tree();
        let link = &root / "hard.txt";
        link.hardlink_to(dir.path().join("src/a.txt")).unwrap();
        assert_eq!(fs::read_to_string(link.as_path()).unwrap(), "alpha");
    }
}
