// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::{env, ffi::OsString, path::PathBuf};

use anyhow::{bail, format_err, Error, Result};
use lexopt::{
    Arg::{Long, Short, Value},
    ValueExt as _,
};

use crate::term::{self, Coloring};

pub(crate) const DEFAULT_TARGET: &str = "libfbxsdk-md.lib";
pub(crate) const DEFAULT_OUTPUT: &str = "fbx_sdk_path.txt";
pub(crate) const DEFAULT_LEVELS: usize = 3;

pub(crate) fn print_version() {
    println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
}

pub(crate) fn print_help() {
    println!(
        "\
{0} {1}
{2}
USAGE:
    {0} [OPTIONS]

Scans local volumes for the FBX SDK library and writes the SDK root
(the directory {DEFAULT_LEVELS} levels above the library) to `{DEFAULT_OUTPUT}`.

OPTIONS:
        --file <NAME>        File name (or glob pattern) to search for
                             [default: {DEFAULT_TARGET}]
        --volume <PATH>...   Search these roots instead of all drives
                             This flag can be used multiple times.
        --output <PATH>      File to write the SDK root to
                             [default: {DEFAULT_OUTPUT}]
        --levels <N>         Number of directories to ascend from the
                             directory containing the file [default: {DEFAULT_LEVELS}]
        --follow-links       Descend into symlinked directories
        --strict             Exit with an error if the file is not found
        --dry-run            Print the SDK root instead of writing it
        --json               Print a JSON report of the run to stdout
    -v, --verbose            Use verbose output
        --color <WHEN>       Coloring: auto, always, never
    -h, --help               Prints help information
    -V, --version            Prints version information
",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_DESCRIPTION"),
    );
}

#[derive(Debug)]
pub(crate) struct Args {
    pub(crate) file: String,
    pub(crate) volumes: Vec<PathBuf>,
    pub(crate) output: PathBuf,
    pub(crate) levels: usize,

    pub(crate) follow_links: bool,
    pub(crate) strict: bool,
    pub(crate) dry_run: bool,
    pub(crate) json: bool,

    pub(crate) help: bool,
    pub(crate) version: bool,
}

impl Args {
    pub(crate) fn parse() -> Result<Self> {
        Self::parse_from(env::args_os().skip(1))
    }

    pub(crate) fn parse_from(args: impl IntoIterator<Item = OsString>) -> Result<Self> {
        let mut parser = lexopt::Parser::from_args(args);

        let mut file: Option<String> = None;
        let mut volumes = vec![];
        let mut output: Option<PathBuf> = None;
        let mut levels: Option<usize> = None;
        let mut color: Option<Coloring> = None;

        let mut follow_links = false;
        let mut strict = false;
        let mut dry_run = false;
        let mut json = false;
        let mut verbose = false;
        let mut help = false;
        let mut version = false;

        while let Some(arg) = parser.next()? {
            macro_rules! parse_opt {
                ($opt:ident, $flag:expr, $conv:expr $(,)?) => {{
                    if $opt.is_some() {
                        multi_arg(&arg)?;
                    }
                    let value = parser.value().map_err(|_| req_arg($flag))?;
                    $opt = Some($conv(value)?);
                }};
            }
            macro_rules! parse_flag {
                ($flag:ident) => {{
                    if std::mem::replace(&mut $flag, true) {
                        multi_arg(&arg)?;
                    }
                }};
            }

            match arg {
                Long("file") => parse_opt!(file, "--file <NAME>", |v: OsString| v.string()),
                Long("volume") => {
                    volumes.push(PathBuf::from(parser.value().map_err(|_| req_arg("--volume <PATH>"))?));
                }
                Long("output") => {
                    parse_opt!(output, "--output <PATH>", |v: OsString| Ok::<_, Error>(PathBuf::from(v)));
                }
                Long("levels") => parse_opt!(levels, "--levels <N>", |v: OsString| v.parse::<usize>()),
                Long("color") => {
                    parse_opt!(color, "--color <WHEN>", |v: OsString| -> Result<Coloring> {
                        Coloring::parse(&v.string()?)
                    });
                }

                Long("follow-links") => parse_flag!(follow_links),
                Long("strict") => parse_flag!(strict),
                Long("dry-run") => parse_flag!(dry_run),
                Long("json") => parse_flag!(json),
                Short('v') | Long("verbose") => parse_flag!(verbose),
                Short('h') | Long("help") => parse_flag!(help),
                Short('V') | Long("version") => parse_flag!(version),

                Value(v) => bail!("unexpected argument `{}`", v.to_string_lossy()),
                _ => return Err(arg.unexpected().into()),
            }
        }

        term::set_coloring(color)?;
        term::set_verbose(verbose);
        term::set_stdout_reserved(json);

        Ok(Self {
            file: file.unwrap_or_else(|| DEFAULT_TARGET.to_owned()),
            volumes,
            output: output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            levels: levels.unwrap_or(DEFAULT_LEVELS),
            follow_links,
            strict,
            dry_run,
            json,
            help,
            version,
        })
    }
}

fn req_arg(flag: &str) -> Error {
    format_err!(
        "\
The argument '{flag}' requires a value but none was supplied

USAGE:
    {} {flag}

For more information try --help
",
        env!("CARGO_PKG_NAME"),
    )
}

fn multi_arg(arg: &lexopt::Arg<'_>) -> Result<()> {
    let flag = format_flag(arg);
    bail!(
        "\
The argument '{flag}' was provided more than once, but cannot be used multiple times

USAGE:
    {} {flag}

For more information try --help
",
        env!("CARGO_PKG_NAME"),
    )
}

fn format_flag(arg: &lexopt::Arg<'_>) -> String {
    match arg {
        Long(flag) => format!("--{flag}"),
        Short(flag) => format!("-{flag}"),
        Value(v) => v.to_string_lossy().into_owned(),
    }
}
