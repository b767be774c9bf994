use regex::Regex;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use crate::error::BackupError;
use crate::utils::system::{run_cmd, run_cmd_inherit};

/// Oldest rsync major version whose `--link-dest` behaves the way snapshots need.
pub const MIN_ENGINE_MAJOR: u32 = 3;

/// recursive, links, perms, times, group, owner, one file system, sparse,
/// xattrs, ACLs
const MODE_FLAGS: &str = "-rlptgoxSXA";

/// The external program that performs the copy.
pub trait CopyEngine {
    /// Raw output of the engine's version query.
    fn version_text(&self) -> Result<String, BackupError>;

    /// Runs the engine to completion with its output going straight to the
    /// terminal. Returns the exit code, `None` if it died from a signal.
    fn execute(&self, args: &[OsString]) -> Result<Option<i32>, BackupError>;
}

/// rsync found on `PATH` (or at an explicit location).
#[derive(Debug, Clone)]
pub struct Rsync {
    program: String,
}

impl Rsync {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn resolve(&self) -> Result<PathBuf, BackupError> {
        which::which(&self.program).map_err(|e| BackupError::EngineUnavailable {
            program: self.program.clone(),
            reason: e.to_string(),
        })
    }
}

impl Default for Rsync {
    fn default() -> Self {
        Self::new("rsync")
    }
}

impl CopyEngine for Rsync {
    fn version_text(&self) -> Result<String, BackupError> {
        let program = self.resolve()?;
        run_cmd(&program, &["--version"]).map_err(|e| BackupError::EngineUnavailable {
            program: self.program.clone(),
            reason: e.to_string(),
        })
    }

    fn execute(&self, args: &[OsString]) -> Result<Option<i32>, BackupError> {
        let program = self.resolve()?;
        let mut command = Command::new(program);
        command.args(args);
        Ok(run_cmd_inherit(&mut command)?.code())
    }
}

/// Pulls `MAJOR.MINOR.PATCH` out of `rsync --version` output.
pub fn parse_version(text: &str) -> Option<(u32, u32, u32)> {
    let re = Regex::new(r"(?m)^\s*rsync\s+version\s+v?([0-9]+)\.([0-9]+)\.([0-9]+)").ok()?;
    let caps = re.captures(text)?;
    Some((
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    ))
}

/// Fails unless the reported major version is at least [`MIN_ENGINE_MAJOR`].
pub fn check_version(text: &str) -> Result<(u32, u32, u32), BackupError> {
    match parse_version(text) {
        Some(version @ (major, _, _)) if major >= MIN_ENGINE_MAJOR => Ok(version),
        Some((major, minor, patch)) => Err(BackupError::UnsupportedEngineVersion {
            version: format!("{}.{}.{}", major, minor, patch),
        }),
        None => Err(BackupError::UnsupportedEngineVersion {
            version: "unknown".to_string(),
        }),
    }
}

/// One fully planned rsync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub source: PathBuf,
    pub snapshot: PathBuf,
    /// Previous snapshot, relative to `snapshot`.
    pub link_dest: Option<PathBuf>,
    pub excludes: Vec<String>,
    pub dry_run: bool,
}

impl Invocation {
    /// The argument vector, program name excluded.
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = [MODE_FLAGS, "--delete", "--progress", "--stats"]
            .iter()
            .map(OsString::from)
            .collect();

        if self.dry_run {
            args.push("--dry-run".into());
        }

        if let Some(link_dest) = &self.link_dest {
            args.push("--link-dest".into());
            args.push(link_dest.clone().into_os_string());
        }

        for exclude in &self.excludes {
            args.push("--exclude".into());
            args.push(exclude.into());
        }

        args.push(self.source.clone().into_os_string());
        args.push(self.snapshot.clone().into_os_string());
        args
    }

    /// Shell-like rendering for logs.
    pub fn display_args(&self) -> String {
        self.to_args()
            .iter()
            .map(|arg| quote(&arg.to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn quote(arg: &str) -> String {
    if !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:+,@".contains(c))
    {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
