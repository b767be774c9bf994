use std::fs;
use std::path::Path;

use crate::backup::naming::SnapshotPattern;
use crate::error::BackupError;

/// Source of a directory's immediate child names.
pub trait DirectoryLister {
    fn list(&self, dir: &Path) -> Result<Vec<String>, BackupError>;
}

/// Lists directories on the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLister;

impl DirectoryLister for FsLister {
    fn list(&self, dir: &Path) -> Result<Vec<String>, BackupError> {
        let unavailable = |source: std::io::Error| BackupError::DestinationUnavailable {
            path: dir.to_path_buf(),
            source,
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(dir).map_err(unavailable)? {
            let entry = entry.map_err(unavailable)?;
            // Non UTF-8 names can never be snapshot names.
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        Ok(names)
    }
}

/// All snapshots of `action_name` in `destination`, oldest first.
pub fn existing_snapshots<L: DirectoryLister + ?Sized>(
    lister: &L,
    destination: &Path,
    action_name: &str,
) -> Result<Vec<String>, BackupError> {
    let pattern = SnapshotPattern::new(action_name)?;
    let mut snapshots: Vec<String> = lister
        .list(destination)?
        .into_iter()
        .filter(|name| pattern.matches(name))
        .collect();
    snapshots.sort();
    Ok(snapshots)
}

/// The newest snapshot of `action_name` in `destination`, if any.
///
/// Names are compared as plain strings; the fixed-width timestamp makes that
/// the same as comparing times. `None` is the normal answer on a first run.
pub fn select_previous<L: DirectoryLister + ?Sized>(
    lister: &L,
    destination: &Path,
    action_name: &str,
) -> Result<Option<String>, BackupError> {
    let pattern = SnapshotPattern::new(action_name)?;
    Ok(lister
        .list(destination)?
        .into_iter()
        .filter(|name| pattern.matches(name))
        .max())
}
