use std::fmt;
use std::io;
use std::path::PathBuf;

/// Everything that can end a coral command early.
///
/// None of these are retried. The task layer decides how each one is shown
/// to the user and which exit code it maps to.
#[derive(Debug)]
pub enum BackupError {
    /// A relative path was given where an absolute one is required.
    InvalidPath { path: PathBuf },
    /// The copy engine reported a major version below the supported minimum.
    UnsupportedEngineVersion { version: String },
    /// The copy engine could not be found or queried at all.
    EngineUnavailable { program: String, reason: String },
    /// The destination directory could not be listed.
    DestinationUnavailable { path: PathBuf, source: io::Error },
    UnknownAction { name: String },
    ActionExists { name: String },
    InvalidActionName,
    /// Snapshot names of this action cannot be matched, e.g. the name is too
    /// large to compile into a pattern.
    ActionPattern { name: String, reason: String },
    NotADirectory { path: PathBuf },
    /// The copy engine ran and exited unsuccessfully. `None` means it was
    /// terminated by a signal.
    CopyEngineFailed { exit_code: Option<i32> },
    /// The settings file could not be read, parsed or written.
    Settings { path: PathBuf, reason: String },
    Io(io::Error),
}

impl fmt::Display for BackupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackupError::InvalidPath { path } => {
                write!(f, "Not an absolute path: {}", path.display())
            }
            BackupError::UnsupportedEngineVersion { version } => write!(
                f,
                "rsync version must be 3.0.0 or newer (found {})",
                version
            ),
            BackupError::EngineUnavailable { program, reason } => {
                write!(f, "Cannot use copy engine '{}': {}", program, reason)
            }
            BackupError::DestinationUnavailable { path, source } => write!(
                f,
                "Cannot read destination directory {}: {}",
                path.display(),
                source
            ),
            BackupError::UnknownAction { name } => {
                write!(f, "Backup action `{}' does not exist.", name)
            }
            BackupError::ActionExists { name } => {
                write!(f, "Backup action `{}' already exists.", name)
            }
            BackupError::InvalidActionName => write!(f, "Backup action name must not be empty."),
            BackupError::ActionPattern { name, reason } => write!(
                f,
                "Cannot match snapshots of backup action `{}': {}",
                name, reason
            ),
            BackupError::NotADirectory { path } => {
                write!(f, "Not a directory: {}", path.display())
            }
            BackupError::CopyEngineFailed {
                exit_code: Some(code),
            } => write!(f, "rsync failed with exit code {}", code),
            BackupError::CopyEngineFailed { exit_code: None } => {
                write!(f, "rsync was terminated by a signal")
            }
            BackupError::Settings { path, reason } => {
                write!(f, "Settings file {}: {}", path.display(), reason)
            }
            BackupError::Io(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for BackupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BackupError::DestinationUnavailable { source, .. } => Some(source),
            BackupError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for BackupError {
    fn from(e: io::Error) -> Self {
        BackupError::Io(e)
    }
}

impl BackupError {
    /// Process exit code for this error when it ends the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            BackupError::CopyEngineFailed {
                exit_code: Some(code),
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}
