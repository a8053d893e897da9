//! Configuration for relaunch.
//!
//! The [`Config`] struct is not constructable, use [`ConfigBuilder`]. It is
//! built once at startup and handed to every component by reference; nothing
//! changes it afterwards.
//!
//! # Examples
//!
//! ```
//! # use relaunch::config::ConfigBuilder;
//! let config = ConfigBuilder::default()
//!     .project_dir("/home/gopher/src/api")
//!     .build_tags("integration")
//!     .build()
//!     .expect("mission failed");
//!
//! assert_eq!(config.binary_path(), std::path::Path::new("/home/gopher/src/api/api"));
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::files::InclusionPolicy;

/// Everything the supervisor needs to know, decided once.
#[derive(Builder, Clone, Debug)]
#[builder(setter(into, strip_option))]
#[builder(build_fn(validate = "Self::validate"))]
#[non_exhaustive]
pub struct Config {
    /// Directory the build runs in and the binary is started from.
    pub project_dir: PathBuf,
    /// Root of the watched tree. Defaults to the project directory.
    #[builder(default)]
    pub watch_dir: Option<PathBuf>,
    /// Build tag selector, passed to the build command after `tags_flag`.
    #[builder(default)]
    pub build_tags: Option<String>,
    /// Descend into the vendor directory as well.
    #[builder(default)]
    pub include_vendor: bool,
    /// Arguments given to every spawned child, in order.
    #[builder(default)]
    pub child_args: Vec<OsString>,
    /// Build program followed by its arguments.
    #[builder(default = "vec![\"go\".into(), \"build\".into()]")]
    pub build_command: Vec<String>,
    #[builder(default = "\"-tags\".into()")]
    pub tags_flag: String,
    /// Binary to run after a build. Defaults to the project directory's
    /// name, inside the project directory.
    #[builder(default)]
    pub binary: Option<PathBuf>,
    #[builder(default = "\".go\".into()")]
    pub source_suffix: String,
    #[builder(default = "\"_test.go\".into()")]
    pub test_suffix: String,
    #[builder(default = "\"vendor\".into()")]
    pub vendor_dir: String,
}

impl ConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.build_command.as_ref().map_or(false, Vec::is_empty) {
            return Err("build_command must not be empty".into());
        }

        let explicit_binary = self.binary.as_ref().map_or(false, Option::is_some);
        if !explicit_binary {
            if let Some(dir) = &self.project_dir {
                if dir.file_name().is_none() {
                    return Err(format!(
                        "cannot name a binary after '{}', it has no final component",
                        dir.display()
                    ));
                }
            }
        }

        Ok(())
    }
}

impl Config {
    pub fn watch_root(&self) -> &Path {
        self.watch_dir.as_deref().unwrap_or(&self.project_dir)
    }

    pub fn binary_path(&self) -> PathBuf {
        match &self.binary {
            Some(binary) => binary.clone(),
            None => {
                let name = self.project_dir.file_name().unwrap_or_default();
                self.project_dir.join(name)
            }
        }
    }

    pub fn inclusion_policy(&self) -> InclusionPolicy {
        InclusionPolicy {
            source_suffix: self.source_suffix.clone(),
            test_suffix: self.test_suffix.clone(),
            vendor_dir: self.vendor_dir.clone(),
            include_vendor: self.include_vendor,
        }
    }
}
