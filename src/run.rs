use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Sender};
use std::thread;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::event::ChangeEvent;
use crate::files;
use crate::process::{Controller, Launcher};
use crate::watcher::{self, Event, Watcher};

/// Builds and starts the program, then rebuilds and restarts it on every
/// write to one of its source files.
///
/// Only returns on error: a failed build, a process that cannot be started,
/// killed or reaped, or a watch that cannot be set up.
pub fn run(config: Config) -> Result<()> {
    let controller = Controller::new(&config)?;
    let child = controller.start()?;

    let (tx, rx) = channel();
    let events = thread::Builder::new()
        .name("relaunch-events".into())
        .spawn(move || {
            let child = supervise(&controller, child, watcher::changes(&rx))?;
            controller.stop(child)
        })?;

    let watcher = match watch(&config, tx) {
        Ok(watcher) => watcher,
        Err(err) => {
            // The change stream is closed, so the event thread stops the child and returns.
            events.join().unwrap_or(Err(Error::EventLoopPanicked))?;
            return Err(err);
        }
    };

    // The event thread owns the process from here on; we only wait for it to fail.
    let outcome = events.join().unwrap_or(Err(Error::EventLoopPanicked));
    drop(watcher);
    outcome
}

/// Enumerates the sources under the watch root and watches each of them.
fn watch(config: &Config, tx: Sender<Event>) -> Result<Watcher> {
    let root = canonicalize(config.watch_root())?;
    let paths = files::source_files(&root, &config.inclusion_policy())?;
    let watcher = Watcher::new(tx, &paths)?;
    info!("Watching {} files under {}", paths.len(), root.display());
    Ok(watcher)
}

/// Restarts `initial` once per change, strictly in order.
///
/// Each stop, build and start finishes before the next change is looked at,
/// so changes arriving mid-restart wait their turn and are never merged. The
/// first failure ends the loop. If the stream of changes ends, so does the
/// loop, handing back the child that is still running.
pub fn supervise<L, C>(launcher: &L, initial: L::Child, changes: C) -> Result<L::Child>
where
    L: Launcher,
    C: IntoIterator<Item = ChangeEvent>,
{
    let mut child = initial;
    for change in changes {
        info!("modified file: {}", change.path.display());

        launcher.stop(child)?;
        debug!("Rebuilding");
        child = launcher.start()?;
    }

    debug!("Change stream closed");
    Ok(child)
}

fn canonicalize(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .map_err(|err| Error::Canonicalization(path.display().to_string(), err))
}
