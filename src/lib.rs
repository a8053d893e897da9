//! Relaunch: the library
//!
//! This is the library behind the `relaunch` CLI tool. The tool builds a
//! project, runs the binary it produces, and rebuilds and restarts it every
//! time one of the project's source files is written to. Everything the binary
//! does is available here so the pieces can be driven (and tested) on their
//! own: [`files`] finds what to watch, [`watcher`] watches it, [`process`]
//! builds and runs the program, and [`run`] ties them together.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    deprecated,
    unsafe_code
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc
)]

#[macro_use]
extern crate clap;
#[macro_use]
extern crate derive_builder;
#[macro_use]
extern crate log;

pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod files;
pub mod process;
pub mod run;
pub mod watcher;

pub use run::run;
