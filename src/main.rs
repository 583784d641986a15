// SPDX-License-Identifier: Apache-2.0 OR MIT

#![forbid(unsafe_code)]

#[macro_use]
mod term;

mod cli;
mod fs;
mod sdk;
mod search;
mod volume;

use std::{
    env,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use anyhow::{bail, Context as _, Result};
use indexmap::IndexSet;
use serde_json::json;

use crate::{
    cli::Args,
    fs::{FileSystem, HostFs},
    search::{Finder, Search, Target},
    volume::{DriveLetters, Explicit, VolumeSource},
};

fn main() {
    if let Err(e) = try_main() {
        error!("{e:#}");
        std::process::exit(1)
    }
}

fn try_main() -> Result<()> {
    let args = Args::parse()?;
    if args.help {
        cli::print_help();
        return Ok(());
    }
    if args.version {
        cli::print_version();
        return Ok(());
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
        .context("failed to install Ctrl-C handler")?;

    let fs = HostFs;
    let report = if args.volumes.is_empty() {
        locate(&fs, &DriveLetters::new(&fs), &args, &interrupted)?
    } else {
        let current_dir = env::current_dir().context("failed to get current directory")?;
        locate(&fs, &Explicit::new(&fs, &args.volumes, &current_dir), &args, &interrupted)?
    };

    if args.json {
        println!("{}", report.to_json());
    } else if args.dry_run {
        if let Some(root) = &report.sdk_path {
            println!("{}", root.display());
        }
    }
    if report.sdk_path.is_none() && args.strict {
        bail!("could not locate {} on any volume", report.target);
    }
    Ok(())
}

/// What a single run did.
struct Report {
    target: Target,
    volumes: IndexSet<PathBuf>,
    search: Search,
    sdk_path: Option<PathBuf>,
    /// The file the SDK path was written to.
    written: Option<PathBuf>,
}

/// Enumerates volumes, searches them, and persists the derived SDK root.
fn locate<F: FileSystem>(
    fs: &F,
    volumes: &impl VolumeSource,
    args: &Args,
    interrupted: &AtomicBool,
) -> Result<Report> {
    let target = Target::parse(&args.file)?;
    let volumes = volumes.roots();
    if volumes.is_empty() {
        warn!("no volumes to search");
    }

    let search = Finder::new(fs, &target, args.follow_links, interrupted).find(&volumes)?;

    let sdk_path = search.found.as_deref().map(|dir| sdk::derive_root(dir, args.levels));
    let mut written = None;
    match &sdk_path {
        Some(root) if !args.dry_run => {
            sdk::persist(root, &args.output)?;
            info!("wrote `{}` to `{}`", root.display(), args.output.display());
            written = Some(args.output.clone());
        }
        Some(_) => {}
        None => notice!("FBX SDK path not found; `{}` was not written", args.output.display()),
    }

    Ok(Report { target, volumes, search, sdk_path, written })
}

impl Report {
    fn to_json(&self) -> serde_json::Value {
        fn path(p: &Path) -> String {
            p.to_string_lossy().into_owned()
        }
        json!({
            "target": self.target.to_string(),
            "volumes": self.volumes.iter().map(|v| path(v)).collect::<Vec<_>>(),
            "found": self.search.found.as_deref().map(path),
            "sdk_path": self.sdk_path.as_deref().map(path),
            "output": self.written.as_deref().map(path),
            "visited": self.search.visited,
            "skipped": self
                .search
                .skipped
                .iter()
                .map(|s| json!({ "path": path(&s.path), "error": s.error.to_string() }))
                .collect::<Vec<_>>(),
        })
    }
}
