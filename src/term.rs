// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::{
    env,
    io::{self, Write as _},
    sync::atomic::{AtomicBool, AtomicU8, Ordering::Relaxed},
};

use anyhow::{bail, Result};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor as _};

static COLORING: AtomicU8 = AtomicU8::new(AUTO);
static VERBOSE: AtomicBool = AtomicBool::new(false);
// Set when stdout carries machine-readable output.
static STDOUT_RESERVED: AtomicBool = AtomicBool::new(false);

const AUTO: u8 = 0;
const ALWAYS: u8 = 1;
const NEVER: u8 = 2;

pub(crate) const COLOR_ENV: &str = "FBXSDK_LOCATE_TERM_COLOR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Coloring {
    Auto,
    Always,
    Never,
}

impl Coloring {
    pub(crate) fn parse(s: &str) -> Result<Self> {
        Ok(match s {
            "auto" => Self::Auto,
            "always" => Self::Always,
            "never" => Self::Never,
            other => bail!("must be auto, always, or never, but found `{other}`"),
        })
    }
}

pub(crate) fn set_coloring(color: Option<Coloring>) -> Result<()> {
    let env_color = match color {
        Some(_) => None,
        None => env::var(COLOR_ENV).ok(),
    };
    let color = match (color, env_color.as_deref()) {
        (Some(color), _) => color,
        (None, Some(s)) => Coloring::parse(s)?,
        (None, None) => Coloring::Auto,
    };
    let color = match color {
        Coloring::Auto => AUTO,
        Coloring::Always => ALWAYS,
        Coloring::Never => NEVER,
    };
    COLORING.store(color, Relaxed);
    Ok(())
}

fn coloring() -> ColorChoice {
    match COLORING.load(Relaxed) {
        AUTO => ColorChoice::Auto,
        ALWAYS => ColorChoice::Always,
        NEVER => ColorChoice::Never,
        _ => unreachable!(),
    }
}

pub(crate) fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Relaxed);
}

pub(crate) fn verbose() -> bool {
    VERBOSE.load(Relaxed)
}

pub(crate) fn set_stdout_reserved(reserved: bool) {
    STDOUT_RESERVED.store(reserved, Relaxed);
}

pub(crate) fn print_status(
    color: Option<Color>,
    kind: &str,
    to_stdout: bool,
    write_msg: impl FnOnce(&mut StandardStream) -> io::Result<()>,
) {
    let mut stream = if to_stdout && !STDOUT_RESERVED.load(Relaxed) {
        StandardStream::stdout(coloring())
    } else {
        StandardStream::stderr(coloring())
    };
    let _ = stream.set_color(ColorSpec::new().set_bold(true).set_fg(color));
    let _ = write!(stream, "{kind}");
    let _ = stream.reset();
    let _ = write!(stream, ": ");
    let _ = write_msg(&mut stream);
}

macro_rules! error {
    ($($msg:expr),* $(,)?) => {{
        use std::io::Write as _;
        crate::term::print_status(Some(termcolor::Color::Red), "error", false, |s| writeln!(s, $($msg),*));
    }};
}

macro_rules! warn {
    ($($msg:expr),* $(,)?) => {{
        use std::io::Write as _;
        crate::term::print_status(Some(termcolor::Color::Yellow), "warning", false, |s| writeln!(s, $($msg),*));
    }};
}

// Like `warn!`, but on stdout so a calling script sees it. Falls back to
// stderr under `--json`.
macro_rules! notice {
    ($($msg:expr),* $(,)?) => {{
        use std::io::Write as _;
        crate::term::print_status(Some(termcolor::Color::Yellow), "warning", true, |s| writeln!(s, $($msg),*));
    }};
}

// Only printed with `--verbose`.
macro_rules! info {
    ($($msg:expr),* $(,)?) => {{
        use std::io::Write as _;
        if crate::term::verbose() {
            crate::term::print_status(None, "info", false, |s| writeln!(s, $($msg),*));
        }
    }};
}
