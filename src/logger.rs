use chrono::Local;
use std::fmt::Display;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::utils::paths::get_log_path;

static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Directs the log file to `path`. Only the first call has any effect.
pub fn init(path: PathBuf) {
    let _ = LOG_PATH.set(path);
}

fn log_path() -> &'static Path {
    LOG_PATH.get_or_init(get_log_path)
}

/// Formats one log file line: `[YYYY-MM-DD HH:MM:SS] message`.
fn format_line(message: &str) -> String {
    let timestamp = Local::now().format("[%Y-%m-%d %H:%M:%S]").to_string();
    format!("{} {}", timestamp, message)
}

fn append(path: &Path, message: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", format_line(message))
}

/// Appends a timestamped message to `coral.log`. A log file that cannot be
/// written never fails the command.
pub fn log(message: &str) {
    let _ = append(log_path(), message);
}

pub fn log_info(message: &str) {
    println!("ℹ️  {}", message);
    log(message);
}

pub fn log_success(message: &str) {
    println!("✅ {}", message);
    log(message);
}

pub fn log_warning(message: &str) {
    eprintln!("⚠️  {}", message);
    log(&format!("WARNING: {}", message));
}

pub fn log_error(context: &str, error: impl Display) {
    eprintln!("❌ {}: {}", context, error);
    log(&format!("ERROR: {}: {}", context, error));
}
