// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::path::{Path, PathBuf};

use indexmap::IndexSet;

use crate::{fs::FileSystem, sdk};

/// Source of volume roots to search.
pub(crate) trait VolumeSource {
    /// Returns existing volume roots, in search order.
    fn roots(&self) -> IndexSet<PathBuf>;
}

/// Probes drive letters `A` through `Z` on the host.
pub(crate) struct DriveLetters<'a, F> {
    fs: &'a F,
}

impl<'a, F: FileSystem> DriveLetters<'a, F> {
    pub(crate) fn new(fs: &'a F) -> Self {
        Self { fs }
    }
}

impl<F: FileSystem> VolumeSource for DriveLetters<'_, F> {
    fn roots(&self) -> IndexSet<PathBuf> {
        (b'A'..=b'Z').map(|letter| drive_root(letter as char)).filter(|p| self.fs.exists(p)).collect()
    }
}

/// The root of the drive named `letter`.
///
/// Outside Windows this is where WSL mounts the drive.
pub(crate) fn drive_root(letter: char) -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(format!("{}:\\", letter.to_ascii_uppercase()))
    } else {
        PathBuf::from(format!("/mnt/{}", letter.to_ascii_lowercase()))
    }
}

/// Roots given explicitly on the command line.
///
/// Relative roots are resolved against `base` so that the containing
/// directory, and the path written from it, are absolute.
pub(crate) struct Explicit<'a, F> {
    fs: &'a F,
    roots: &'a [PathBuf],
    base: &'a Path,
}

impl<'a, F: FileSystem> Explicit<'a, F> {
    pub(crate) fn new(fs: &'a F, roots: &'a [PathBuf], base: &'a Path) -> Self {
        Self { fs, roots, base }
    }
}

impl<F: FileSystem> VolumeSource for Explicit<'_, F> {
    fn roots(&self) -> IndexSet<PathBuf> {
        self.roots
            .iter()
            .map(|root| sdk::normalize(&self.base.join(root)))
            .filter(|root| {
                let exists = self.fs.exists(root);
                if !exists {
                    warn!("volume `{}` does not exist", root.display());
                }
                exists
            })
            .collect()
    }
}
