use crate::backup::resolver::{absolute, normalize_dir, relative_to};
use crate::cli::AddArgs;
use crate::error::BackupError;
use crate::logger::{log, log_error, log_success, log_warning};
use crate::settings::{BackupAction, SettingsFile};
use std::path::{Component, Path, PathBuf};

/// Run the add command with the provided arguments
pub fn run(args: AddArgs, settings_path: &Path) {
    match add_action(&args, settings_path) {
        Ok(action) => {
            log_success(&format!("Added backup action `{}'", args.action));
            println!("   Source: {}", action.source.display());
            println!("   Destination: {}", action.destination.display());
            println!("   Excluded files: {}", action.exclusions.len());
        }
        Err(e) => {
            log_error("Failed to add backup action", &e);
            std::process::exit(e.exit_code());
        }
    }
}

fn add_action(args: &AddArgs, settings_path: &Path) -> Result<BackupAction, BackupError> {
    let mut settings = SettingsFile::load_or_create(settings_path)?;
    if settings.settings().contains(&args.action) {
        return Err(BackupError::ActionExists {
            name: args.action.clone(),
        });
    }

    let action = build_action(args)?;
    settings.add(&args.action, action.clone())?;
    log(&format!(
        "Added backup action {}: {} -> {}",
        args.action,
        action.source.display(),
        action.destination.display()
    ));
    Ok(action)
}

/// Validates the arguments and normalizes every path the way they are stored.
fn build_action(args: &AddArgs) -> Result<BackupAction, BackupError> {
    if args.action.is_empty() {
        return Err(BackupError::InvalidActionName);
    }

    let source = existing_dir(&args.source)?;
    let exclusions = collect_exclusions(&args.exclusions, &source)?;
    let destination = existing_dir(&args.destination)?;

    Ok(BackupAction {
        source,
        destination,
        exclusions,
        last_run_time: None,
    })
}

fn existing_dir(path: &Path) -> Result<PathBuf, BackupError> {
    let dir = absolute(path)?;
    if !dir.is_dir() {
        return Err(BackupError::NotADirectory { path: dir });
    }
    Ok(normalize_dir(&dir))
}

/// Absolute, existing, deduplicated exclusions in the order given.
/// Missing paths are skipped with a warning. Paths that are not strictly
/// inside `source` are kept but can never match, so they are warned about.
fn collect_exclusions(paths: &[PathBuf], source: &Path) -> Result<Vec<PathBuf>, BackupError> {
    let mut exclusions: Vec<PathBuf> = Vec::new();
    for path in paths {
        let mut excluded = absolute(path)?;
        if !excluded.exists() {
            log_warning(&format!(
                "No such file or directory, not excluded: {}",
                excluded.display()
            ));
            continue;
        }
        if excluded.is_dir() {
            excluded = normalize_dir(&excluded);
        }
        if !inside_source(&excluded, source)? {
            log_warning(&format!(
                "Not inside source {}, will never be excluded: {}",
                source.display(),
                excluded.display()
            ));
        }
        if !exclusions.contains(&excluded) {
            exclusions.push(excluded);
        }
    }
    Ok(exclusions)
}

/// True iff `path` lies strictly below `source`.
fn inside_source(path: &Path, source: &Path) -> Result<bool, BackupError> {
    let rel = relative_to(path, source)?;
    Ok(rel
        .components()
        .next()
        .is_some_and(|first| matches!(first, Component::Normal(_))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(action: &str, source: &Path, destination: &Path, exclusions: Vec<PathBuf>) -> AddArgs {
        AddArgs {
            action: action.to_string(),
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            exclusions,
        }
    }

    #[test]
    fn test_build_action_normalizes_directories() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();

        let action = build_action(&args("docs", src.path(), dst.path(), vec![])).unwrap();

        assert!(action.source.as_os_str().to_string_lossy().ends_with('/'));
        assert!(action.destination.as_os_str().to_string_lossy().ends_with('/'));
        assert!(action.source.is_absolute());
        assert!(action.exclusions.is_empty());
        assert!(action.last_run_time.is_none());
    }

    #[test]
    fn test_build_action_rejects_missing_source() {
        let dst = TempDir::new().unwrap();
        let missing = dst.path().join("missing");

        let result = build_action(&args("docs", &missing, dst.path(), vec![]));
        assert!(matches!(result, Err(BackupError::NotADirectory { .. })));
    }

    #[test]
    fn test_build_action_rejects_file_destination() {
        let src = TempDir::new().unwrap();
        let file = src.path().join("file.txt");
        fs::write(&file, "").unwrap();

        let result = build_action(&args("docs", src.path(), &file, vec![]));
        assert!(matches!(result, Err(BackupError::NotADirectory { path }) if path == file));
    }

    #[test]
    fn test_build_action_rejects_empty_name() {
        let src = TempDir::new().unwrap();
        let result = build_action(&args("", src.path(), src.path(), vec![]));
        assert!(matches!(result, Err(BackupError::InvalidActionName)));
    }

    #[test]
    fn test_collect_exclusions_dedupes_and_normalizes() {
        let src = TempDir::new().unwrap();
        let cache = src.path().join("cache");
        let notes = src.path().join("notes.txt");
        fs::create_dir(&cache).unwrap();
        fs::write(&notes, "").unwrap();

        let exclusions = collect_exclusions(
            &[
                cache.clone(),
                notes.clone(),
                src.path().join("cache/."),
                src.path().join("missing"),
            ],
            &normalize_dir(src.path()),
        )
        .unwrap();

        assert_eq!(exclusions.len(), 2);
        assert!(exclusions[0].as_os_str().to_string_lossy().ends_with("cache/"));
        assert!(exclusions[1].as_os_str().to_string_lossy().ends_with("notes.txt"));
    }

    #[test]
    fn test_add_action_persists_and_rejects_duplicates() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        let settings_path = home.path().join("settings.json");

        add_action(&args("docs", src.path(), dst.path(), vec![]), &settings_path).unwrap();
        let result = add_action(&args("docs", src.path(), dst.path(), vec![]), &settings_path);
        assert!(matches!(result, Err(BackupError::ActionExists { .. })));

        let settings = SettingsFile::load_or_create(&settings_path).unwrap();
        assert!(settings.settings().contains("docs"));
    }

    #[test]
    fn test_inside_source() {
        let source = Path::new("/src/docs/");
        assert!(inside_source(Path::new("/src/docs/cache/"), source).unwrap());
        assert!(inside_source(Path::new("/src/docs/a/b.txt"), source).unwrap());
        assert!(!inside_source(Path::new("/src/docs/"), source).unwrap());
        assert!(!inside_source(Path::new("/src/docs"), source).unwrap());
        assert!(!inside_source(Path::new("/src/"), source).unwrap());
        assert!(!inside_source(Path::new("/other/thing"), source).unwrap());
        assert!(!inside_source(Path::new("/src/docsx/a"), source).unwrap());
    }

    #[test]
    fn test_collect_exclusions_keeps_paths_outside_source() {
        let root = TempDir::new().unwrap();
        let src = root.path().join("src");
        let elsewhere = root.path().join("elsewhere");
        fs::create_dir(&src).unwrap();
        fs::create_dir(&elsewhere).unwrap();

        let exclusions =
            collect_exclusions(&[elsewhere.clone(), src.clone()], &normalize_dir(&src)).unwrap();

        assert_eq!(
            exclusions,
            vec![normalize_dir(&elsewhere), normalize_dir(&src)]
        );
    }
}
