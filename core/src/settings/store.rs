use std::path::PathBuf;

use stance_types::AppSettings;
use thiserror::Error;

const APP_DIR: &str = "stance";
const SETTINGS_FILE: &str = "settings.json";

/// Errors while writing the settings record. Reads never fail — they fall
/// back to defaults.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to write settings file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize settings")]
    Serialize(#[from] serde_json::Error),
}

/// Persists [`AppSettings`] as a single JSON document.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store under the platform config directory
    /// (`~/.config/stance/settings.json` on Linux).
    pub fn new() -> Self {
        let path = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(SETTINGS_FILE);
        Self { path }
    }

    /// Store at an explicit path. Used by tests.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Read the record. Missing file → defaults silently; unreadable or
    /// corrupt file → defaults with a warning. Loaded speech parameters
    /// are clamped back into range.
    pub fn load(&self) -> AppSettings {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return AppSettings::default();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read settings, using defaults");
                return AppSettings::default();
            }
        };

        match serde_json::from_str::<AppSettings>(&content) {
            Ok(mut settings) => {
                settings.clamp_speech_params();
                settings
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "corrupt settings file, using defaults");
                AppSettings::default()
            }
        }
    }

    /// Replace the whole record on disk.
    pub fn save(&self, settings: &AppSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SettingsError::Write {
                path: self.path.clone(),
                source: e,
            })?;
        }

        let content = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, content).map_err(|e| SettingsError::Write {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stance_types::SessionKind;

    fn temp_store() -> (tempfile::TempDir, SettingsStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::with_path(dir.path().join("settings.json"));
        (dir, store)
    }

    #[test]
    fn missing_file_loads_defaults() {
        let (_dir, store) = temp_store();
        assert_eq!(store.load(), AppSettings::default());
    }

    #[test]
    fn save_then_load_round_trips_every_field() {
        let (_dir, store) = temp_store();
        let settings = AppSettings {
            timer_duration_secs: 15 * 60,
            speech_enabled: true,
            selected_voice: Some("en-gb".to_string()),
            speech_rate: 1.5,
            speech_pitch: 0.75,
            speech_volume: 0.25,
            current_session: SessionKind::Standing,
            session_count: 42,
        };

        store.save(&settings).unwrap();
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn none_voice_survives_round_trip() {
        let (_dir, store) = temp_store();
        let settings = AppSettings::default();
        store.save(&settings).unwrap();
        assert_eq!(store.load().selected_voice, None);
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let (_dir, store) = temp_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{not json").unwrap();
        assert_eq!(store.load(), AppSettings::default());
    }

    #[test]
    fn out_of_range_params_are_clamped_on_load() {
        let (_dir, store) = temp_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(
            store.path(),
            r#"{"speech_rate": 99.0, "speech_pitch": -5.0, "speech_volume": 2.0}"#,
        )
        .unwrap();

        let settings = store.load();
        assert_eq!(settings.speech_rate, 2.0);
        assert_eq!(settings.speech_pitch, 0.0);
        assert_eq!(settings.speech_volume, 1.0);
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::with_path(dir.path().join("nested/dir/settings.json"));
        store.save(&AppSettings::default()).unwrap();
        assert!(store.path().exists());
    }
}
