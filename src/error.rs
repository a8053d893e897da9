use std::path::PathBuf;
use std::process::ExitStatus;
use std::{error::Error as StdError, fmt, io};

pub type Result<T> = ::std::result::Result<T, Error>;

pub enum Error {
    Args(clap::Error),
    Build(BuildFailure),
    BuildInvocation(String, io::Error),
    Canonicalization(String, io::Error),
    Config(String),
    CurrentDir(io::Error),
    EventLoopPanicked,
    Io(io::Error),
    Notify(notify::Error),
    Reap(u32, io::Error),
    Signal(u32, io::Error),
    Spawn(PathBuf, io::Error),
    Walk(walkdir::Error),
    Watch(PathBuf, notify::Error),
}

/// A build that ran to completion but did not succeed.
#[derive(Clone, Debug)]
pub struct BuildFailure {
    pub status: ExitStatus,
    /// Whatever the build tool wrote to stderr.
    pub diagnostics: String,
}

impl StdError for Error {}

impl From<clap::Error> for Error {
    fn from(err: clap::Error) -> Self {
        Error::Args(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<notify::Error> for Error {
    fn from(err: notify::Error) -> Self {
        match err {
            notify::Error::Io(err) => Error::Io(err),
            other => Error::Notify(other),
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::Walk(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Build diagnostics go out untouched, they are what the user wants to read.
        if let Error::Build(failure) = self {
            return f.write_str(&failure.diagnostics);
        }

        write!(
            f,
            "{} error: {}",
            match self {
                Error::Args(_) => "Argument",
                Error::Build(_) | Error::BuildInvocation(_, _) => "Build",
                Error::Canonicalization(_, _) => "Path",
                Error::Config(_) => "Configuration",
                Error::CurrentDir(_) => "Path",
                Error::EventLoopPanicked => "Internal",
                Error::Io(_) => "I/O",
                Error::Notify(_) | Error::Watch(_, _) => "Notify",
                Error::Reap(_, _) | Error::Signal(_, _) | Error::Spawn(_, _) => "Process",
                Error::Walk(_) => "Watch dir",
            },
            match self {
                Error::Args(err) => format!("{}", err),
                Error::Build(failure) => failure.diagnostics.clone(),
                Error::BuildInvocation(program, err) => {
                    format!("couldn't run '{}': {}", program, err)
                }
                Error::Canonicalization(path, err) => {
                    format!("couldn't canonicalize '{}':\n{}", path, err)
                }
                Error::Config(msg) => msg.clone(),
                Error::CurrentDir(err) => {
                    format!("could not get current working directory: {}", err)
                }
                Error::EventLoopPanicked => "the event loop panicked".into(),
                Error::Io(err) => format!("{}", err),
                Error::Notify(err) => format!("{}", err),
                Error::Reap(pid, err) => format!("couldn't wait for process {}: {}", pid, err),
                Error::Signal(pid, err) => format!("couldn't kill process {}: {}", pid, err),
                Error::Spawn(path, err) => format!("couldn't start '{}': {}", path.display(), err),
                Error::Walk(err) => format!("could not read watch dir: {}", err),
                Error::Watch(path, err) => format!("couldn't watch '{}': {}", path.display(), err),
            }
        )
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
