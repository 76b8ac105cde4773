use anyhow::Result;
use async_trait::async_trait;

use crate::models::{CaptureSnapshot, PreferenceRecord};
use crate::persistence::PreferenceBackend;

use super::Database;

/// SQLite-backed preference storage scoped to one user.
#[derive(Clone)]
pub struct SqliteBackend {
    db: Database,
    user_id: String,
}

impl SqliteBackend {
    pub fn new(db: Database, user_id: impl Into<String>) -> Self {
        Self {
            db,
            user_id: user_id.into(),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

#[async_trait]
impl PreferenceBackend for SqliteBackend {
    async fn load(&self) -> Result<Vec<PreferenceRecord>> {
        self.db.load_preferences(&self.user_id).await
    }

    async fn save(&self, records: Vec<PreferenceRecord>) -> Result<()> {
        self.db.replace_preferences(&self.user_id, records).await
    }

    async fn save_capture(&self, snapshot: CaptureSnapshot) -> Result<()> {
        self.db.insert_capture(&self.user_id, snapshot).await
    }
}
