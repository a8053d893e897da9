use notify::{raw_watcher, RecommendedWatcher, RecursiveMode};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};

use crate::error::{Error, Result};
use crate::event::ChangeEvent;

pub use notify::RawEvent as Event;

/// Thin wrapper over the notify crate
///
/// Every file gets its own non-recursive watch, so files created after
/// startup are never picked up. Dropping the `Watcher` releases all watches.
pub struct Watcher {
    _watcher_impl: RecommendedWatcher,
}

impl Watcher {
    /// Registers a watch for each path, sending raw events to `tx`.
    ///
    /// Every registration is attempted; if any failed, the last failure is
    /// returned once all of them have been tried.
    pub fn new(tx: Sender<Event>, paths: &[PathBuf]) -> Result<Self> {
        use notify::Watcher;

        let mut watcher = raw_watcher(tx)?;
        let mut failure = None;

        for path in paths {
            match watcher.watch(path, RecursiveMode::NonRecursive) {
                Ok(()) => debug!("Watching {:?}", path),
                Err(err) => {
                    debug!("Unable to watch {:?}: {}", path, err);
                    failure = Some(Error::Watch(path.clone(), err));
                }
            }
        }

        if let Some(err) = failure {
            return Err(err);
        }

        Ok(Self {
            _watcher_impl: watcher,
        })
    }
}

/// The ordered stream of writes coming out of a watcher's channel.
///
/// Blocks between events and ends only once every sender is gone.
pub fn changes(rx: &Receiver<Event>) -> impl Iterator<Item = ChangeEvent> + '_ {
    rx.iter().filter_map(ChangeEvent::from_raw)
}
