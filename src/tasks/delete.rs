use crate::error::BackupError;
use crate::logger::{log, log_error, log_success};
use crate::settings::SettingsFile;
use std::path::Path;

/// Remove a backup action. Snapshots already written are left alone.
pub fn run(action: String, settings_path: &Path) {
    match delete_action(&action, settings_path) {
        Ok(()) => log_success(&format!("Deleted backup action `{}'", action)),
        Err(e) => {
            log_error("Failed to delete backup action", &e);
            std::process::exit(e.exit_code());
        }
    }
}

fn delete_action(action: &str, settings_path: &Path) -> Result<(), BackupError> {
    let mut settings = SettingsFile::load_or_create(settings_path)?;
    let removed = settings.delete(action)?;
    log(&format!(
        "Deleted backup action {} (snapshots in {} kept)",
        action,
        removed.destination.display()
    ));
    Ok(())
}
