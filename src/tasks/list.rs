use crate::error::BackupError;
use crate::logger::log_error;
use crate::settings::SettingsFile;
use std::path::Path;

/// Print every action name, one per line, sorted.
pub fn run(settings_path: &Path) {
    match names(settings_path) {
        Ok(names) => {
            for name in names {
                println!("{}", name);
            }
        }
        Err(e) => {
            log_error("Failed to load settings", &e);
            std::process::exit(e.exit_code());
        }
    }
}

fn names(settings_path: &Path) -> Result<Vec<String>, BackupError> {
    let settings = SettingsFile::load_or_create(settings_path)?;
    Ok(settings
        .settings()
        .action_names()
        .map(str::to_string)
        .collect())
}
