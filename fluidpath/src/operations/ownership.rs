//! Permission bits, ownership and timestamps.

use std::path::Path;

use filetime::FileTime;

use super::Owner;
use crate::error::{Error, Result};
use crate::path::SemanticPath;
use crate::platform::{self, PlatformOps};

/// Permission bits (including setuid, setgid and sticky) within a mode.
const PERMISSION_MASK: u32 = 0o7777;

impl SemanticPath {
    /// Set the permission bits, following symlinks.
    ///
    /// # Errors
    ///
    /// The wrapped OS error.
    pub fn chmod(&self, mode: u32) -> Result<()> {
        platform::native().set_mode(self.as_path(), mode, true)
    }

    /// Change the owning user and/or group.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if neither `user` nor `group` is given.
    /// - [`Error::UnknownUser`] / [`Error::UnknownGroup`] for unknown names.
    /// - [`Error::PlatformUnsupported`] where ownership does not exist.
    pub fn chown(
        &self,
        user: Option<Owner>,
        group: Option<Owner>,
        follow_symlinks: bool,
    ) -> Result<()> {
        self.chown_with(platform::native(), user, group, follow_symlinks)
    }

    pub(crate) fn chown_with(
        &self,
        ops: &dyn PlatformOps,
        user: Option<Owner>,
        group: Option<Owner>,
        follow_symlinks: bool,
    ) -> Result<()> {
        if user.is_none() && group.is_none() {
            return Err(Error::Validation {
                field: "chown".to_string(),
                message: "user and/or group must be set".to_string(),
            });
        }
        let uid = match user {
            Some(Owner::Id(id)) => Some(id),
            Some(Owner::Name(name)) => Some(ops.user_id(&name)?),
            None => None,
        };
        let gid = match group {
            Some(Owner::Id(id)) => Some(id),
            Some(Owner::Name(name)) => Some(ops.group_id(&name)?),
            None => None,
        };
        ops.change_owner(self.as_path(), uid, gid, follow_symlinks)
    }

    /// Give `to` the same permission bits as this path.
    ///
    /// # Errors
    ///
    /// [`Error::PlatformUnsupported`] when `follow_symlinks` is false and `to`
    /// is a symlink on a platform that cannot change link permissions.
    pub fn copy_permissions(&self, to: impl AsRef<Path>, follow_symlinks: bool) -> Result<()> {
        let ops = platform::native();
        let mode = ops.mode_bits(&self.stat(follow_symlinks)?) & PERMISSION_MASK;
        ops.set_mode(to.as_ref(), mode, follow_symlinks)
    }

    /// Give `to` the same permission bits and access/modification times as
    /// this path.
    ///
    /// # Errors
    ///
    /// Same as [`copy_permissions`](Self::copy_permissions), plus timestamp
    /// failures.
    pub fn copy_stat(&self, to: impl AsRef<Path>, follow_symlinks: bool) -> Result<()> {
        let to = to.as_ref();
        self.copy_permissions(to, follow_symlinks)?;

        let metadata = self.stat(follow_symlinks)?;
        let atime = FileTime::from_last_access_time(&metadata);
        let mtime = FileTime::from_last_modification_time(&metadata);
        let result = if follow_symlinks {
            filetime::set_file_times(to, atime, mtime)
        } else {
            filetime::set_symlink_file_times(to, atime, mtime)
        };
        result.map_err(|e| Error::from_io("set_times", to, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::SemanticType;
    use crate::platform::MockPlatformOps;
    use std::fs;
    use tempfile::TempDir;

    fn file_in(dir: &TempDir, name: &str) -> SemanticPath {
        let path = dir.path().join(name);
        fs::write(&path, name).unwrap();
        SemanticPath::new(path)
    }

    #[test]
    fn test_chown_requires_user_or_group() {
        let dir = TempDir::new().unwrap();
        let ops = MockPlatformOps::new();
        let err = file_in(&dir, "f")
            .chown_with(&ops, None, None, true)
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_chown_resolves_names() {
        let dir = TempDir::new().unwrap();
        let file = file_in(&dir, "f");
        let expected_path = file.to_path_buf();

        let mut ops = MockPlatformOps::new();
        ops.expect_user_id()
            .withf(|name| name == "alice")
            .returning(|_| Ok(1001));
        ops.expect_change_owner()
            .withf(move |path, uid, gid, follow| {
                path == expected_path && *uid == Some(1001) && *gid == Some(50) && !*follow
            })
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        file.chown_with(&ops, Some("alice".into()), Some(Owner::Id(50)), false)
            .unwrap();
    }

    #[test]
    fn test_chown_unknown_group() {
        let dir = TempDir::new().unwrap();
        let mut ops = MockPlatformOps::new();
        ops.expect_group_id().returning(|name| {
            Err(Error::UnknownGroup {
                name: name.to_string(),
            })
        });
        let err = file_in(&dir, "f")
            .chown_with(&ops, None, Some("nogroup-x".into()), true)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownGroup { .. }));
    }

    #[test]
    #[cfg(unix)]
    fn test_chmod_and_copy_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let a = file_in(&dir, "a");
        let b = file_in(&dir, "b");
        a.chmod(0o640).unwrap();
        b.chmod(0o600).unwrap();
        a.copy_permissions(b.as_path(), true).unwrap();
        let mode = fs::metadata(b.as_path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[test]
    fn test_copy_stat_copies_mtime() {
        let dir = TempDir::new().unwrap();
        let a = file_in(&dir, "a");
        let b = file_in(&dir, "b");
        let past = FileTime::from_unix_time(2_000_000, 0);
        filetime::set_file_mtime(a.as_path(), past).unwrap();

        a.copy_stat(b.as_path(), true).unwrap();
        let metadata = fs::metadata(b.as_path()).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&metadata), past);
        assert_eq!(b.semantic_type(), SemanticType::File);
    }

    #[test]
    #[cfg(unix)]
    fn test_copy_permissions_onto_symlink_unsupported() {
        let dir = TempDir::new().unwrap();
        let a = file_in(&dir, "a");
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(a.as_path(), &link).unwrap();
        let err = a.copy_permissions(&link, false).unwrap_err();
        assert!(err.is_unsupported());
    }
}
