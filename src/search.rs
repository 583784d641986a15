// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::{
    ffi::OsStr,
    fmt, io,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering::Relaxed},
    vec,
};

use anyhow::{bail, Context as _, Result};

use crate::{fs::FileSystem, term};

/// The file name to look for.
#[derive(Debug)]
pub(crate) enum Target {
    Name(String),
    Pattern(glob::Pattern),
}

impl Target {
    pub(crate) fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            bail!("target file name must not be empty");
        }
        if s.contains(['/', '\\']) {
            bail!("target `{s}` must be a file name, not a path");
        }
        if s.contains(['*', '?', '[']) {
            let pattern = glob::Pattern::new(s)
                .with_context(|| format!("invalid target file pattern `{s}`"))?;
            Ok(Self::Pattern(pattern))
        } else {
            Ok(Self::Name(s.to_owned()))
        }
    }

    pub(crate) fn matches(&self, name: &OsStr) -> bool {
        match self {
            Self::Name(n) => name == OsStr::new(n),
            Self::Pattern(p) => name.to_str().map_or(false, |name| p.matches(name)),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(n) => f.write_str(n),
            Self::Pattern(p) => f.write_str(p.as_str()),
        }
    }
}

/// A directory that could not be read during the walk.
#[derive(Debug)]
pub(crate) struct Skipped {
    pub(crate) path: PathBuf,
    pub(crate) error: io::Error,
}

/// Outcome of a search over all volumes.
#[derive(Debug, Default)]
pub(crate) struct Search {
    /// The directory containing the target file.
    pub(crate) found: Option<PathBuf>,
    pub(crate) visited: usize,
    pub(crate) skipped: Vec<Skipped>,
}

pub(crate) struct Finder<'a, F> {
    fs: &'a F,
    target: &'a Target,
    follow_links: bool,
    interrupted: &'a AtomicBool,
}

struct Frame<Id> {
    id: Option<Id>,
    dirs: vec::IntoIter<PathBuf>,
}

enum Visit<Id> {
    Found,
    Descend(Frame<Id>),
    Skip,
}

impl<'a, F: FileSystem> Finder<'a, F> {
    pub(crate) fn new(
        fs: &'a F,
        target: &'a Target,
        follow_links: bool,
        interrupted: &'a AtomicBool,
    ) -> Self {
        Self { fs, target, follow_links, interrupted }
    }

    /// Searches `roots` in order and stops at the first directory that
    /// directly contains the target.
    pub(crate) fn find<'r>(&self, roots: impl IntoIterator<Item = &'r PathBuf>) -> Result<Search> {
        let mut search = Search::default();
        for root in roots {
            info!("searching `{}`", root.display());
            if let Some(dir) = self.walk(root, &mut search)? {
                info!("found {} in `{}`", self.target, dir.display());
                search.found = Some(dir);
                return Ok(search);
            }
        }
        if !search.skipped.is_empty() && !term::verbose() {
            warn!(
                "{} directories could not be read and were skipped (use --verbose to list them)",
                search.skipped.len()
            );
        }
        notice!("{} not found on any volume", self.target);
        Ok(search)
    }

    fn walk(&self, root: &Path, search: &mut Search) -> Result<Option<PathBuf>> {
        let mut stack: Vec<Frame<F::Id>> = vec![];
        match self.visit(root, &stack, search)? {
            Visit::Found => return Ok(Some(root.to_path_buf())),
            Visit::Descend(frame) => stack.push(frame),
            Visit::Skip => {}
        }
        while let Some(top) = stack.last_mut() {
            let Some(dir) = top.dirs.next() else {
                stack.pop();
                continue;
            };
            match self.visit(&dir, &stack, search)? {
                Visit::Found => return Ok(Some(dir)),
                Visit::Descend(frame) => stack.push(frame),
                Visit::Skip => {}
            }
        }
        Ok(None)
    }

    fn visit(
        &self,
        dir: &Path,
        ancestors: &[Frame<F::Id>],
        search: &mut Search,
    ) -> Result<Visit<F::Id>> {
        if self.interrupted.load(Relaxed) {
            bail!("interrupted while searching `{}`", dir.display());
        }

        let id = if self.follow_links {
            let id = match self.fs.dir_id(dir) {
                Ok(id) => id,
                Err(e) => return Ok(skip(dir, e, search)),
            };
            if ancestors.iter().any(|frame| frame.id.as_ref() == Some(&id)) {
                info!("skipped `{}`: symlink cycle", dir.display());
                return Ok(Visit::Skip);
            }
            Some(id)
        } else {
            None
        };

        let mut entries = match self.fs.read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => return Ok(skip(dir, e, search)),
        };
        search.visited += 1;

        if entries.iter().any(|e| !e.is_dir && self.target.matches(&e.name)) {
            return Ok(Visit::Found);
        }

        entries.retain(|e| e.is_dir && (self.follow_links || !e.is_symlink));
        entries.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        let dirs: Vec<_> = entries.into_iter().map(|e| dir.join(e.name)).collect();
        Ok(Visit::Descend(Frame { id, dirs: dirs.into_iter() }))
    }
}

fn skip<Id>(dir: &Path, error: io::Error, search: &mut Search) -> Visit<Id> {
    if term::verbose() {
        warn!("skipped `{}`: {error}", dir.display());
    }
    search.skipped.push(Skipped { path: dir.to_path_buf(), error });
    Visit::Skip
}
