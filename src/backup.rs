//! Snapshot planning and execution.
//!
//! A snapshot is a directory named `{action} backup {YYYY-MM-DD-HHMMSS}` inside
//! the action's destination. Each new snapshot is written by rsync with
//! `--link-dest` pointing at the newest existing one, so unchanged files are
//! hardlinks rather than copies.

pub mod exclusions;
pub mod naming;
pub mod resolver;
pub mod rsync;
pub mod runner;
pub mod selector;
