use notify::{op, RawEvent};
use std::path::{Path, PathBuf};

/// What happened to a watched path, reduced to the kinds we tell apart.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Operation {
    Write,
    Create,
    Remove,
    Rename,
    Chmod,
    Other,
}

impl Operation {
    /// Classifies a native op. Writes win over everything else, so a
    /// coalesced `WRITE | CHMOD` still counts as a write.
    pub fn from_op(op_: op::Op) -> Self {
        if Self::is_write(op_) {
            Operation::Write
        } else if op_.contains(op::CREATE) {
            Operation::Create
        } else if op_.contains(op::REMOVE) {
            Operation::Remove
        } else if op_.contains(op::RENAME) {
            Operation::Rename
        } else if op_.contains(op::CHMOD) {
            Operation::Chmod
        } else {
            Operation::Other
        }
    }

    // CLOSE_WRITE alone is not a write.
    fn is_write(op_: op::Op) -> bool {
        op_.contains(op::WRITE)
    }
}

/// A write to a watched file: the only thing that triggers a restart.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct ChangeEvent {
    pub path: PathBuf,
}

impl ChangeEvent {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Keeps raw events that carry a path and a decodable write op.
    pub fn from_raw(event: RawEvent) -> Option<Self> {
        let op_ = match event.op {
            Ok(op_) => op_,
            Err(err) => {
                debug!("Dropping undecodable event for {:?}: {}", event.path, err);
                return None;
            }
        };

        match (event.path, Operation::from_op(op_)) {
            (Some(path), Operation::Write) => Some(Self { path }),
            (path, operation) => {
                trace!("Ignoring {:?} on {:?}", operation, path);
                None
            }
        }
    }
}
