//! Workstation personalization engine.
//!
//! Two halves share one configuration: a dotfile synchronizer that merges
//! repository-tracked files into the home directory inside marker-delimited
//! custom sections, and an installer that sets up software via Homebrew.
//!
//! The synchronizer never destroys user content. Deploys strip stale custom
//! sections and append exactly one fresh one, every touched file is backed
//! up first, and [`sync::Syncer::capture`] pulls home-side edits back into
//! the repository.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod fsops;
pub mod install;
pub mod logging;
pub mod markers;
pub mod sync;
