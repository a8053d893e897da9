//! Command line handling.
//!
//! Almost every argument belongs to the program being supervised and is passed
//! along verbatim. Three modifiers are ours, and they may appear anywhere:
//!
//! - `--build-tags=<tags>`: build tags handed to the build command
//! - `--include-vendor`: watch the vendor directory too
//! - `--watch-dir=<path>`: watch this tree instead of the current directory

use std::env;
use std::ffi::OsString;
use std::iter;
use std::path::PathBuf;

use clap::{App, Arg};

use crate::config::{Config, ConfigBuilder};
use crate::error::{Error, Result};

const BUILD_TAGS: &str = "--build-tags=";
const INCLUDE_VENDOR: &str = "--include-vendor";
const WATCH_DIR: &str = "--watch-dir=";

/// Arguments sorted into our modifiers and everything else.
#[derive(Debug, Default, PartialEq)]
pub struct SplitArgs {
    pub modifiers: Vec<OsString>,
    pub forwarded: Vec<OsString>,
}

/// Sorts a full argument list (program name first) into modifiers and
/// forwarded arguments. The program name goes nowhere.
pub fn split_args<I, T>(args: I) -> SplitArgs
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut split = SplitArgs::default();
    for arg in args.into_iter().skip(1).map(Into::into) {
        let (valued, flag) = {
            let text = arg.to_string_lossy();
            (
                text.starts_with(BUILD_TAGS) || text.starts_with(WATCH_DIR),
                text.starts_with(INCLUDE_VENDOR),
            )
        };

        if valued {
            split.modifiers.push(arg);
        } else if flag {
            split.modifiers.push(INCLUDE_VENDOR.into());
        } else {
            split.forwarded.push(arg);
        }
    }

    split
}

fn app() -> App<'static, 'static> {
    App::new(crate_name!())
        .version(crate_version!())
        .about("Rebuild and restart a program whenever its sources change")
        .arg(
            Arg::with_name("build-tags")
                .help("Build tags passed to the build command")
                .long("build-tags")
                .takes_value(true)
                .empty_values(true)
                .multiple(true)
                .number_of_values(1)
                .value_name("tags"),
        )
        .arg(
            Arg::with_name("include-vendor")
                .help("Also watch the vendor directory")
                .long("include-vendor")
                .multiple(true),
        )
        .arg(
            Arg::with_name("watch-dir")
                .help("Directory to watch [default: .]")
                .long("watch-dir")
                .takes_value(true)
                .empty_values(true)
                .multiple(true)
                .number_of_values(1)
                .value_name("path"),
        )
}

/// Builds the configuration from a full argument list.
pub fn parse<I, T>(args: I, project_dir: PathBuf) -> Result<Config>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let split = split_args(args);
    let matches = app()
        .get_matches_from_safe(iter::once(OsString::from(crate_name!())).chain(split.modifiers))?;

    let mut builder = ConfigBuilder::default();
    builder
        .project_dir(project_dir)
        .child_args(split.forwarded)
        .include_vendor(matches.is_present("include-vendor"));

    // Repeated modifiers: the last one wins.
    if let Some(tags) = matches
        .values_of_lossy("build-tags")
        .and_then(|mut tags| tags.pop())
    {
        if !tags.is_empty() {
            builder.build_tags(tags);
        }
    }

    if let Some(dir) = matches.values_of_os("watch-dir").and_then(Iterator::last) {
        if !dir.is_empty() {
            builder.watch_dir(PathBuf::from(dir));
        }
    }

    builder.build().map_err(Error::Config)
}

/// Reads the configuration from this process's arguments, rooted at the
/// current directory.
pub fn get_config() -> Result<Config> {
    let project_dir = env::current_dir().map_err(Error::CurrentDir)?;
    parse(env::args_os(), project_dir)
}
