use crate::backup::naming::SnapshotPattern;
use crate::backup::selector::{DirectoryLister, FsLister, existing_snapshots};
use crate::error::BackupError;
use crate::logger::{log_error, log_warning};
use crate::settings::{BackupAction, SettingsFile};
use std::path::Path;

/// Show the definition of a backup action and the snapshots it has produced
pub fn run(action: String, settings_path: &Path) {
    let settings = match SettingsFile::load_or_create(settings_path) {
        Ok(settings) => settings,
        Err(e) => {
            log_error("Failed to load settings", &e);
            std::process::exit(e.exit_code());
        }
    };
    let data = match settings.settings().action(&action) {
        Ok(data) => data,
        Err(e) => {
            log_error("Failed to show backup action", &e);
            std::process::exit(e.exit_code());
        }
    };

    for line in describe(data) {
        println!("{}", line);
    }

    match snapshot_summary(&FsLister, &action, data) {
        Ok(summary) => println!("{}", summary),
        Err(e) => log_warning(&format!("Could not look for snapshots: {}", e)),
    }
}

fn describe(data: &BackupAction) -> Vec<String> {
    let mut lines = vec![
        format!("Source: {}", data.source.display()),
        format!("Destination: {}", data.destination.display()),
    ];

    if data.exclusions.is_empty() {
        lines.push("Excluded files: (No excluded files)".to_string());
    } else {
        lines.push(format!(
            "Excluded files: {} excluded file(s)",
            data.exclusions.len()
        ));
        lines.extend(data.exclusions.iter().map(|e| format!("  {}", e.display())));
    }

    lines.push(match &data.last_run_time {
        Some(at) => format!(
            "Last backup executed at: {}",
            at.format("%Y-%m-%d %H:%M:%S %z")
        ),
        None => "Last backup executed at: No backup yet".to_string(),
    });
    lines
}

fn snapshot_summary<L: DirectoryLister + ?Sized>(
    lister: &L,
    action_name: &str,
    data: &BackupAction,
) -> Result<String, BackupError> {
    let snapshots = existing_snapshots(lister, &data.destination, action_name)?;
    let pattern = SnapshotPattern::new(action_name)?;
    Ok(match snapshots.last() {
        Some(newest) => match pattern.timestamp(newest) {
            Some(taken) => format!(
                "Snapshots: {} (newest: {}, taken {})",
                snapshots.len(),
                newest,
                taken.format("%Y-%m-%d %H:%M:%S")
            ),
            None => format!("Snapshots: {} (newest: {})", snapshots.len(), newest),
        },
        None => "Snapshots: none".to_string(),
    })
}
