//! Last-used duration and action, persisted as a flat JSON record

use std::{fs, io, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::services::PowerAction;
use crate::state::ScheduleRequest;

/// The record handed to and from the settings file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSettings {
    pub duration_seconds: u64,
    #[serde(rename = "actionKind", default)]
    pub action: PowerAction,
}

impl ScheduleSettings {
    pub fn new(duration_seconds: u64, action: PowerAction) -> Self {
        Self { duration_seconds, action }
    }

    /// Request pre-populated from this record
    pub fn to_request(&self) -> ScheduleRequest {
        ScheduleRequest::new(i64::try_from(self.duration_seconds).unwrap_or(i64::MAX), self.action)
    }
}

/// Load the settings record; a missing file yields `None`
pub fn load(path: &Path) -> anyhow::Result<Option<ScheduleSettings>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No settings file at {}", path.display());
            return Ok(None);
        }
        Err(e) => return Err(e).with_context(|| format!("Could not read settings from {}", path.display())),
    };

    let settings = serde_json::from_str(&contents)
        .with_context(|| format!("Could not parse settings in {}", path.display()))?;
    Ok(Some(settings))
}

/// Write the settings record, creating parent directories as needed
pub fn save(path: &Path, settings: &ScheduleSettings) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Could not create {}", parent.display()))?;
    }
    let contents = serde_json::to_string_pretty(settings)?;
    fs::write(path, contents).with_context(|| format!("Could not save settings to {}", path.display()))?;
    debug!("Saved settings to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load(&dir.path().join("settings.json")).unwrap(), None);
    }

    #[test]
    fn saved_record_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = ScheduleSettings::new(900, PowerAction::Hibernate);

        save(&path, &settings).unwrap();
        assert_eq!(load(&path).unwrap(), Some(settings));
    }

    #[test]
    fn record_uses_flat_camel_case_shape() {
        let json = serde_json::to_value(ScheduleSettings::new(30, PowerAction::Sleep)).unwrap();
        assert_eq!(json, serde_json::json!({ "durationSeconds": 30, "actionKind": "sleep" }));
    }

    #[test]
    fn action_defaults_to_sleep() {
        let settings: ScheduleSettings = serde_json::from_str(r#"{"durationSeconds": 12}"#).unwrap();
        assert_eq!(settings.action, PowerAction::Sleep);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(load(&path).is_err());
    }

    #[test]
    fn negative_duration_is_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"durationSeconds": -5, "actionKind": "sleep"}"#).unwrap();
        assert!(load(&path).is_err());
    }
}
