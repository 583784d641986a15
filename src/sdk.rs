// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::path::{Component, Path, PathBuf};

use anyhow::{Context as _, Result};

/// Returns the directory `levels` above `dir`, lexically normalized.
///
/// No filesystem access is made, so symlinks in `dir` are not resolved.
pub(crate) fn derive_root(dir: &Path, levels: usize) -> PathBuf {
    let mut path = dir.to_path_buf();
    for _ in 0..levels {
        path.push(Component::ParentDir);
    }
    normalize(&path)
}

/// Lexically resolves `.` and `..` segments.
///
/// `..` directly under a root is dropped, leading `..` of a relative path is
/// kept.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = vec![];
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                Some(Component::ParentDir) | None => out.push(component),
                Some(Component::CurDir) => unreachable!(),
            },
            _ => out.push(component),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Writes `root` to `output`, replacing any previous content.
pub(crate) fn persist(root: &Path, output: &Path) -> Result<()> {
    let root = root
        .to_str()
        .with_context(|| format!("SDK path `{}` is not valid UTF-8", root.display()))?;
    crate::fs::write(output, root)
}
