// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::{
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result};
use same_file::Handle;

/// A wrapper for [`std::fs::write`].
pub(crate) fn write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    let res = fs::write(path, contents.as_ref());
    res.with_context(|| format!("failed to write to file `{}`", path.display()))
}

/// A directory entry as seen by the locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry {
    pub(crate) name: OsString,
    /// Whether this is a directory after following symlinks.
    pub(crate) is_dir: bool,
    pub(crate) is_symlink: bool,
}

#[cfg(test)]
impl Entry {
    pub(crate) fn file(name: impl Into<OsString>) -> Self {
        Self { name: name.into(), is_dir: false, is_symlink: false }
    }

    pub(crate) fn dir(name: impl Into<OsString>) -> Self {
        Self { name: name.into(), is_dir: true, is_symlink: false }
    }

    pub(crate) fn dir_link(name: impl Into<OsString>) -> Self {
        Self { name: name.into(), is_dir: true, is_symlink: true }
    }
}

/// Read access to a directory tree.
pub(crate) trait FileSystem {
    /// Identity of a directory, used to detect symlink cycles.
    type Id: PartialEq;

    fn exists(&self, path: &Path) -> bool;

    /// Lists the direct entries of `dir`, in any order.
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<Entry>>;

    fn dir_id(&self, dir: &Path) -> io::Result<Self::Id>;
}

/// The host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct HostFs;

impl FileSystem for HostFs {
    // Handles stay open while held, so only ancestors of the current
    // directory are ever kept.
    type Id = Handle;

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_dir(&self, dir: &Path) -> io::Result<Vec<Entry>> {
        let mut entries = vec![];
        for entry in fs::read_dir(dir)? {
            // An entry that vanished mid-listing has no name to report.
            let Ok(entry) = entry else { continue };
            let (is_dir, is_symlink) = classify(entry.file_type(), || entry.path());
            entries.push(Entry { name: entry.file_name(), is_dir, is_symlink });
        }
        Ok(entries)
    }

    fn dir_id(&self, dir: &Path) -> io::Result<Handle> {
        Handle::from_path(dir)
    }
}

/// Returns `(is_dir, is_symlink)` for a directory entry.
///
/// An entry whose type cannot be determined counts as a file, as does a
/// dangling link.
fn classify(file_type: io::Result<fs::FileType>, path: impl FnOnce() -> PathBuf) -> (bool, bool) {
    match file_type {
        Ok(file_type) if file_type.is_symlink() => {
            (fs::metadata(path()).map_or(false, |m| m.is_dir()), true)
        }
        Ok(file_type) => (file_type.is_dir(), false),
        Err(_) => (false, false),
    }
}
