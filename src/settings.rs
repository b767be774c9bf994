use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::BackupError;

pub const SETTINGS_VERSION: &str = "1.0.0";

/// A named backup definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupAction {
    /// Absolute, with a trailing separator.
    pub source: PathBuf,
    /// Absolute, with a trailing separator.
    pub destination: PathBuf,
    /// Absolute paths; directories carry a trailing separator.
    #[serde(default)]
    pub exclusions: Vec<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run_time: Option<DateTime<Local>>,
}

/// What the backup runner needs from wherever actions are kept.
pub trait SettingsStore {
    fn get_action(&self, name: &str) -> Result<BackupAction, BackupError>;

    /// Stores `at` as the last successful run of `name`.
    fn record_run_time(&mut self, name: &str, at: DateTime<Local>) -> Result<(), BackupError>;
}

/// All configured actions, keyed by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub version: String,
    #[serde(default)]
    pub actions: BTreeMap<String, BackupAction>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: SETTINGS_VERSION.to_string(),
            actions: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Action names in sorted order.
    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn action(&self, name: &str) -> Result<&BackupAction, BackupError> {
        self.actions
            .get(name)
            .ok_or_else(|| BackupError::UnknownAction {
                name: name.to_string(),
            })
    }

    pub fn add(&mut self, name: &str, action: BackupAction) -> Result<(), BackupError> {
        if name.is_empty() {
            return Err(BackupError::InvalidActionName);
        }
        if self.contains(name) {
            return Err(BackupError::ActionExists {
                name: name.to_string(),
            });
        }
        self.actions.insert(name.to_string(), action);
        Ok(())
    }

    pub fn delete(&mut self, name: &str) -> Result<BackupAction, BackupError> {
        self.actions
            .remove(name)
            .ok_or_else(|| BackupError::UnknownAction {
                name: name.to_string(),
            })
    }
}

impl SettingsStore for Settings {
    fn get_action(&self, name: &str) -> Result<BackupAction, BackupError> {
        self.action(name).cloned()
    }

    fn record_run_time(&mut self, name: &str, at: DateTime<Local>) -> Result<(), BackupError> {
        match self.actions.get_mut(name) {
            Some(action) => {
                action.last_run_time = Some(at);
                Ok(())
            }
            None => Err(BackupError::UnknownAction {
                name: name.to_string(),
            }),
        }
    }
}

/// Settings backed by a JSON file. Every mutation is written out immediately.
#[derive(Debug)]
pub struct SettingsFile {
    path: PathBuf,
    settings: Settings,
}

impl SettingsFile {
    /// Load settings from file, creating a default one if it doesn't exist
    pub fn load_or_create(path: &Path) -> Result<Self, BackupError> {
        let settings = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| settings_error(path, e))?;
            serde_json::from_str(&content).map_err(|e| settings_error(path, e))?
        } else {
            let settings = Settings::default();
            save(path, &settings)?;
            settings
        };

        Ok(Self {
            path: path.to_path_buf(),
            settings,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn add(&mut self, name: &str, action: BackupAction) -> Result<(), BackupError> {
        self.settings.add(name, action)?;
        self.save()
    }

    pub fn delete(&mut self, name: &str) -> Result<BackupAction, BackupError> {
        let removed = self.settings.delete(name)?;
        self.save()?;
        Ok(removed)
    }

    pub fn save(&self) -> Result<(), BackupError> {
        save(&self.path, &self.settings)
    }
}

impl SettingsStore for SettingsFile {
    fn get_action(&self, name: &str) -> Result<BackupAction, BackupError> {
        self.settings.get_action(name)
    }

    fn record_run_time(&mut self, name: &str, at: DateTime<Local>) -> Result<(), BackupError> {
        self.settings.record_run_time(name, at)?;
        self.save()
    }
}

fn settings_error(path: &Path, e: impl std::fmt::Display) -> BackupError {
    BackupError::Settings {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

fn save(path: &Path, settings: &Settings) -> Result<(), BackupError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| settings_error(path, e))?;
        }
    }
    let content = serde_json::to_string_pretty(settings).map_err(|e| settings_error(path, e))?;
    std::fs::write(path, content).map_err(|e| settings_error(path, e))
}
