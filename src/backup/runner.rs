use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::backup::exclusions::{HOST_IS_MACOS, platform_defaults, translate};
use crate::backup::naming::new_snapshot_dir_name;
use crate::backup::resolver::{normalize_dir, relative_to};
use crate::backup::rsync::{CopyEngine, Invocation, Rsync, check_version};
use crate::backup::selector::{DirectoryLister, FsLister, select_previous};
use crate::error::BackupError;
use crate::settings::{BackupAction, SettingsStore};

/// Source of the instant a run is stamped with.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Pass `--dry-run` to rsync and never record the run.
    pub dry_run: bool,
    /// Record the run time after a successful real run.
    pub update_time: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            update_time: true,
        }
    }
}

/// A run that passed preflight and has been fully planned, but not started.
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub action_name: String,
    /// The single instant used for the snapshot name and the recorded run time.
    pub started_at: DateTime<Local>,
    /// Name of the snapshot hardlinked against, if there was one.
    pub previous: Option<String>,
    pub invocation: Invocation,
    pub options: RunOptions,
}

impl PreparedRun {
    pub fn snapshot_path(&self) -> &Path {
        &self.invocation.snapshot
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub snapshot: PathBuf,
    pub previous: Option<String>,
    pub started_at: DateTime<Local>,
    pub recorded: bool,
}

/// Drives one snapshot of one action from preflight to completion.
pub struct BackupRunner<E, L, C> {
    engine: E,
    lister: L,
    clock: C,
    /// Whether `/Volumes/<vol>/` sources get the macOS volume exclusions.
    macos_volumes: bool,
}

impl BackupRunner<Rsync, FsLister, SystemClock> {
    pub fn with_rsync(program: impl Into<String>) -> Self {
        Self::new(Rsync::new(program), FsLister, SystemClock)
    }
}

impl<E: CopyEngine, L: DirectoryLister, C: Clock> BackupRunner<E, L, C> {
    pub fn new(engine: E, lister: L, clock: C) -> Self {
        Self {
            engine,
            lister,
            clock,
            macos_volumes: HOST_IS_MACOS,
        }
    }

    /// Computes the rsync invocation for `action` at `now`.
    ///
    /// `--link-dest` is expressed relative to the new snapshot directory,
    /// because that is how rsync resolves a relative link-dest.
    pub fn plan(
        &self,
        action_name: &str,
        action: &BackupAction,
        now: &DateTime<Local>,
        dry_run: bool,
    ) -> Result<(Invocation, Option<String>), BackupError> {
        let source = normalize_dir(&action.source);
        let destination = &action.destination;
        for dir in [&source, destination] {
            if !dir.is_absolute() {
                return Err(BackupError::InvalidPath { path: dir.clone() });
            }
        }

        let snapshot = destination.join(new_snapshot_dir_name(action_name, now));
        let previous = select_previous(&self.lister, destination, action_name)?;

        let link_dest = match &previous {
            Some(name) => Some(relative_to(&destination.join(name), &snapshot)?),
            None => None,
        };

        let mut excludes = translate(&action.exclusions, &source)?;
        excludes.extend(platform_defaults(&source, self.macos_volumes));

        Ok((
            Invocation {
                source,
                snapshot,
                link_dest,
                excludes,
                dry_run,
            },
            previous,
        ))
    }

    /// Checks the engine version, loads the action and plans the run.
    /// Nothing is spawned and nothing is written.
    pub fn prepare<S: SettingsStore + ?Sized>(
        &self,
        action_name: &str,
        store: &S,
        options: RunOptions,
    ) -> Result<PreparedRun, BackupError> {
        check_version(&self.engine.version_text()?)?;

        let action = store.get_action(action_name)?;
        let started_at = self.clock.now();
        let (invocation, previous) =
            self.plan(action_name, &action, &started_at, options.dry_run)?;

        Ok(PreparedRun {
            action_name: action_name.to_string(),
            started_at,
            previous,
            invocation,
            options,
        })
    }

    /// Runs rsync for a prepared run and records it on success.
    ///
    /// A failed rsync leaves whatever it already wrote in place.
    pub fn execute<S: SettingsStore + ?Sized>(
        &self,
        prepared: PreparedRun,
        store: &mut S,
    ) -> Result<RunReport, BackupError> {
        match self.engine.execute(&prepared.invocation.to_args())? {
            Some(0) => {}
            exit_code => return Err(BackupError::CopyEngineFailed { exit_code }),
        }

        let options = prepared.options;
        let recorded = !options.dry_run && options.update_time;
        if recorded {
            store.record_run_time(&prepared.action_name, prepared.started_at)?;
        }

        Ok(RunReport {
            snapshot: prepared.invocation.snapshot,
            previous: prepared.previous,
            started_at: prepared.started_at,
            recorded,
        })
    }

    pub fn run<S: SettingsStore + ?Sized>(
        &self,
        action_name: &str,
        store: &mut S,
        options: RunOptions,
    ) -> Result<RunReport, BackupError> {
        let prepared = self.prepare(action_name, &*store, options)?;
        self.execute(prepared, store)
    }
}
