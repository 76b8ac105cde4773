use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::models::PreferenceRecord;

use super::PreferenceBackend;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredPreferences {
    user_id: String,
    records: Vec<PreferenceRecord>,
}

/// Whole-store JSON file, one file per user.
pub struct JsonFileBackend {
    path: PathBuf,
    user_id: String,
    write_lock: Mutex<()>,
}

impl JsonFileBackend {
    pub fn new(path: PathBuf, user_id: impl Into<String>) -> Self {
        Self {
            path,
            user_id: user_id.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PreferenceBackend for JsonFileBackend {
    async fn load(&self) -> Result<Vec<PreferenceRecord>> {
        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(Vec::new());
        }

        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read preferences from {}", self.path.display()))?;
        let stored: StoredPreferences = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse preferences in {}", self.path.display()))?;

        if stored.user_id != self.user_id {
            return Ok(Vec::new());
        }
        Ok(stored.records)
    }

    async fn save(&self, records: Vec<PreferenceRecord>) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("failed to create preferences directory {}", parent.display())
            })?;
        }

        let stored = StoredPreferences {
            user_id: self.user_id.clone(),
            records,
        };
        let serialized = serde_json::to_string_pretty(&stored)?;

        // written to a sibling temp file, then renamed over the target
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serialized)
            .await
            .with_context(|| format!("Failed to write preferences to {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))
    }
}
