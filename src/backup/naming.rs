use chrono::{DateTime, Local, NaiveDateTime};
use regex::Regex;

use crate::error::BackupError;

/// strftime format of the timestamp embedded in snapshot directory names.
///
/// Fixed width and zero padded, so byte order of names equals time order.
/// Snapshot selection depends on that.
pub const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H%M%S";

const SNAPSHOT_SEPARATOR: &str = " backup ";

/// Directory name for a new snapshot of `action_name` taken at `now`.
///
/// Two runs of one action within the same second produce the same name.
pub fn new_snapshot_dir_name(action_name: &str, now: &DateTime<Local>) -> String {
    format!(
        "{}{}{}",
        action_name,
        SNAPSHOT_SEPARATOR,
        now.format(SNAPSHOT_TIMESTAMP_FORMAT)
    )
}

/// Recognizes snapshot directory names belonging to one action.
#[derive(Debug, Clone)]
pub struct SnapshotPattern {
    re: Regex,
}

impl SnapshotPattern {
    pub fn new(action_name: &str) -> Result<Self, BackupError> {
        let re = Regex::new(&format!(
            r"^{}{}([0-9]{{4}}-[0-9]{{2}}-[0-9]{{2}}-[0-9]{{6}})$",
            regex::escape(action_name),
            regex::escape(SNAPSHOT_SEPARATOR)
        ))
        .map_err(|e| pattern_error(action_name, e))?;
        Ok(Self { re })
    }

    /// True iff `dir_name` is `{action_name} backup YYYY-MM-DD-HHMMSS`.
    pub fn matches(&self, dir_name: &str) -> bool {
        self.re.is_match(dir_name)
    }

    /// The instant encoded in a matching name, or `None` if the name does not
    /// belong to this action or its digits are not a real date.
    pub fn timestamp(&self, dir_name: &str) -> Option<NaiveDateTime> {
        let caps = self.re.captures(dir_name)?;
        NaiveDateTime::parse_from_str(caps.get(1)?.as_str(), SNAPSHOT_TIMESTAMP_FORMAT).ok()
    }
}

fn pattern_error(action_name: &str, e: regex::Error) -> BackupError {
    BackupError::ActionPattern {
        name: action_name.to_string(),
        reason: e.to_string(),
    }
}
