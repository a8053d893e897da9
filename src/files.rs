//! Finding the source files to watch.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::Result;

const HIDDEN_MARKER: &str = ".";

/// Which entries under the watch root are worth watching.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InclusionPolicy {
    /// Files must end with this...
    pub source_suffix: String,
    /// ...and must not end with this.
    pub test_suffix: String,
    /// Directory name skipped unless `include_vendor` is set.
    pub vendor_dir: String,
    pub include_vendor: bool,
}

impl Default for InclusionPolicy {
    fn default() -> Self {
        Self {
            source_suffix: ".go".into(),
            test_suffix: "_test.go".into(),
            vendor_dir: "vendor".into(),
            include_vendor: false,
        }
    }
}

impl InclusionPolicy {
    fn descends_into(&self, name: &str) -> bool {
        !name.starts_with(HIDDEN_MARKER) && (self.include_vendor || name != self.vendor_dir)
    }

    fn includes(&self, name: &str) -> bool {
        name.ends_with(&self.source_suffix) && !name.ends_with(&self.test_suffix)
    }
}

/// Lists every eligible source file under `root`, depth-first, in the order
/// the directories list them.
///
/// The rules only apply below `root`: the root is always read, even when its
/// own name is hidden. Any directory that cannot be read fails the whole
/// listing.
pub fn source_files(root: &Path, policy: &InclusionPolicy) -> Result<Vec<PathBuf>> {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || policy.descends_into(&name_of(entry))
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.depth() == 0 || entry.file_type().is_dir() {
            continue;
        }

        if policy.includes(&name_of(&entry)) {
            files.push(entry.into_path());
        }
    }

    debug!("Found {} source files under {:?}", files.len(), root);
    Ok(files)
}

fn name_of(entry: &DirEntry) -> Cow<'_, str> {
    entry.file_name().to_string_lossy()
}
