use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::error::BackupError;

/// Appends a trailing `/` to `path` unless it already ends with one.
///
/// rsync treats a trailing separator on the source operand as "copy the
/// contents of", so directories stored in settings always carry one.
pub fn normalize_dir(path: &Path) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_os_string();
    if !raw.as_encoded_bytes().ends_with(b"/") {
        raw.push("/");
    }
    PathBuf::from(raw)
}

/// Lexically expresses `path` relative to `base`.
///
/// Both arguments must be absolute. The result may climb out of `base` with
/// `..` segments, and is `.` when the two paths name the same directory.
/// Trailing separators are not significant and are not carried into the result.
pub fn relative_to(path: &Path, base: &Path) -> Result<PathBuf, BackupError> {
    for p in [path, base] {
        if !p.is_absolute() {
            return Err(BackupError::InvalidPath {
                path: p.to_path_buf(),
            });
        }
    }

    let path = lexical_components(path);
    let base = lexical_components(base);

    let common = path
        .iter()
        .zip(base.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for part in &path[common..] {
        relative.push(part);
    }

    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    Ok(relative)
}

/// Expands `~`, anchors relative paths at the current directory and folds
/// away `.` and `..` segments without touching the filesystem.
pub fn absolute(path: &Path) -> Result<PathBuf, BackupError> {
    let expanded = match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
        None => path.to_path_buf(),
    };

    let anchored = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir()?.join(expanded)
    };

    let mut resolved = PathBuf::from("/");
    for part in lexical_components(&anchored) {
        resolved.push(part);
    }
    Ok(resolved)
}

/// Lexical parent of an absolute path, with `.`/`..` folded first.
pub fn parent_dir(path: &Path) -> PathBuf {
    let mut parts = lexical_components(path);
    parts.pop();

    let mut parent = PathBuf::from("/");
    for part in parts {
        parent.push(part);
    }
    parent
}

/// The normal components of an absolute path after folding `.` and `..`.
/// `..` at the root stays at the root.
fn lexical_components(path: &Path) -> Vec<OsString> {
    let mut parts: Vec<OsString> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(s) => parts.push(s.to_os_string()),
            Component::ParentDir => {
                parts.pop();
            }
            Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
        }
    }
    parts
}
