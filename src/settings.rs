use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use crate::compositor::DEFAULT_MODE;
use crate::db::{Database, SqliteBackend};
use crate::persistence::{JsonFileBackend, MemoryBackend, PreferenceBackend};
use crate::preferences::PreferenceConfig;

/// Environment flag that forces debug-level logging in the binary.
pub const DEBUG_ENV: &str = "SCENETUNE_DEBUG";

pub fn debug_enabled() -> bool {
    std::env::var(DEBUG_ENV)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Sqlite,
    Json,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    pub user_id: String,
    pub default_mode: String,
    pub sampling_interval_ms: u64,
    pub render_interval_ms: u64,
    pub similarity_threshold: f64,
    pub max_records: usize,
    pub backend: BackendKind,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            user_id: "local".into(),
            default_mode: DEFAULT_MODE.into(),
            sampling_interval_ms: 500,
            render_interval_ms: 33,
            similarity_threshold: 0.70,
            max_records: 100,
            backend: BackendKind::Sqlite,
        }
    }
}

impl EngineSettings {
    pub fn sampling_interval(&self) -> Duration {
        Duration::from_millis(self.sampling_interval_ms.max(1))
    }

    pub fn render_interval(&self) -> Duration {
        Duration::from_millis(self.render_interval_ms.max(1))
    }

    pub fn preference_config(&self) -> PreferenceConfig {
        PreferenceConfig {
            similarity_threshold: self.similarity_threshold.clamp(0.0, 1.0),
            max_records: self.max_records.max(1),
            ..PreferenceConfig::default()
        }
    }
}

/// Build the configured persistence backend rooted at `data_dir`.
pub fn build_backend(
    settings: &EngineSettings,
    data_dir: &Path,
) -> Result<Arc<dyn PreferenceBackend>> {
    let backend: Arc<dyn PreferenceBackend> = match settings.backend {
        BackendKind::Sqlite => {
            let db = Database::new(data_dir.join("scenetune.sqlite3"))
                .context("failed to open preference database")?;
            Arc::new(SqliteBackend::new(db, settings.user_id.clone()))
        }
        BackendKind::Json => Arc::new(JsonFileBackend::new(
            data_dir.join(format!("preferences-{}.json", settings.user_id)),
            settings.user_id.clone(),
        )),
        BackendKind::Memory => Arc::new(MemoryBackend::new()),
    };
    Ok(backend)
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<EngineSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            EngineSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> EngineSettings {
        self.read().clone()
    }

    pub fn update(&self, settings: EngineSettings) -> Result<()> {
        let mut guard = self.write();
        *guard = settings;
        self.persist(&guard)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        let data: EngineSettings = serde_json::from_str(&contents)?;
        *self.write() = data;
        Ok(())
    }

    fn persist(&self, data: &EngineSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, EngineSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, EngineSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        assert_eq!(store.get(), EngineSettings::default());
    }

    #[test]
    fn unparsable_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        let store = SettingsStore::new(path).unwrap();
        assert_eq!(store.get(), EngineSettings::default());
    }

    #[test]
    fn partial_file_fills_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"userId":"ana","backend":"json","maxRecords":10}"#).unwrap();

        let settings = SettingsStore::new(path).unwrap().get();
        assert_eq!(settings.user_id, "ana");
        assert_eq!(settings.backend, BackendKind::Json);
        assert_eq!(settings.max_records, 10);
        assert_eq!(settings.sampling_interval_ms, 500);
        assert_eq!(settings.default_mode, DEFAULT_MODE);
    }

    #[test]
    fn update_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let store = SettingsStore::new(path.clone()).unwrap();

        let settings = EngineSettings {
            default_mode: "vivid".into(),
            backend: BackendKind::Memory,
            ..EngineSettings::default()
        };
        store.update(settings.clone()).unwrap();

        let reopened = SettingsStore::new(path).unwrap();
        assert_eq!(reopened.get(), settings);
        reopened.reload().unwrap();
        assert_eq!(reopened.get(), settings);
    }

    #[test]
    fn preference_config_carries_overrides() {
        let settings = EngineSettings {
            similarity_threshold: 0.9,
            max_records: 0,
            ..EngineSettings::default()
        };
        let config = settings.preference_config();
        assert_eq!(config.similarity_threshold, 0.9);
        assert_eq!(config.max_records, 1);
        assert_eq!(config.liked_weight, 3);
    }
}
