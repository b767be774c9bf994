use crate::backup::runner::{BackupRunner, RunOptions};
use crate::cli::ExecArgs;
use crate::error::BackupError;
use crate::logger::{log, log_error, log_info, log_success};
use crate::settings::SettingsFile;
use crate::utils::paths::get_rsync_program;
use std::path::Path;

/// Run the exec command with the provided arguments
pub fn run(args: ExecArgs, settings_path: &Path) {
    if let Err(e) = exec(&args, settings_path, &get_rsync_program()) {
        log_error(&format!("Backup action `{}' failed", args.action), &e);
        std::process::exit(e.exit_code());
    }
}

fn exec(args: &ExecArgs, settings_path: &Path, rsync: &str) -> Result<(), BackupError> {
    let mut settings = SettingsFile::load_or_create(settings_path)?;
    let runner = BackupRunner::with_rsync(rsync);
    let options = RunOptions {
        dry_run: args.dry_run,
        update_time: !args.no_update_time,
    };

    let prepared = runner.prepare(&args.action, &settings, options)?;

    if options.dry_run {
        println!("🔍 Running in dry-run mode - nothing will be written");
    }
    println!(
        "🔁 Backing up {} to {}",
        prepared.invocation.source.display(),
        prepared.snapshot_path().display()
    );
    match &prepared.previous {
        Some(previous) => println!("🔗 Hardlinking unchanged files from {}", previous),
        None => println!("🆕 No previous snapshot, copying everything"),
    }
    log(&format!(
        "{}Starting {}: {} {}",
        if options.dry_run { "[DRY RUN] " } else { "" },
        args.action,
        rsync,
        prepared.invocation.display_args()
    ));

    let report = runner.execute(prepared, &mut settings)?;

    if options.dry_run {
        log_info(&format!("Dry run of `{}' complete", args.action));
    } else {
        log_success(&format!(
            "Backup `{}' complete: {}",
            args.action,
            report.snapshot.display()
        ));
    }
    if let Some(previous) = &report.previous {
        log(&format!("Linked {} against {}", args.action, previous));
    }
    if report.recorded {
        log(&format!(
            "Recorded last run of {} at {}",
            args.action,
            report.started_at.to_rfc3339()
        ));
    }
    Ok(())
}
