use directories_next::BaseDirs;
use std::path::{Path, PathBuf};

/// Name of the settings file inside the coral directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Name of the log file, stored next to the settings file.
pub const LOG_FILE: &str = "coral.log";

/// Environment variable overriding the settings file location.
pub const SETTINGS_ENV: &str = "CORAL_SETTINGS";

/// Environment variable overriding the rsync program.
pub const RSYNC_ENV: &str = "CORAL_RSYNC";

fn env_override(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `~/.coral`, falling back to the current directory when no home is known.
pub fn get_coral_dir() -> PathBuf {
    match BaseDirs::new() {
        Some(base_dirs) => base_dirs.home_dir().join(".coral"),
        None => PathBuf::from(".coral"),
    }
}

pub fn get_settings_path() -> PathBuf {
    match env_override(SETTINGS_ENV) {
        Some(path) => PathBuf::from(path),
        None => get_coral_dir().join(SETTINGS_FILE),
    }
}

/// The log file lives beside whichever settings file is in use.
pub fn get_log_path_for(settings_path: &Path) -> PathBuf {
    match settings_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(LOG_FILE),
        _ => PathBuf::from(LOG_FILE),
    }
}

pub fn get_log_path() -> PathBuf {
    get_log_path_for(&get_settings_path())
}

pub fn get_rsync_program() -> String {
    env_override(RSYNC_ENV).unwrap_or_else(|| "rsync".to_string())
}
