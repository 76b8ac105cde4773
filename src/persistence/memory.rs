use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::models::{CaptureSnapshot, PreferenceRecord};

use super::PreferenceBackend;

/// Process-local backend. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: Mutex<Vec<PreferenceRecord>>,
    captures: Mutex<Vec<CaptureSnapshot>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<PreferenceRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            captures: Mutex::new(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<PreferenceRecord> {
        match self.records.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn captures(&self) -> Vec<CaptureSnapshot> {
        match self.captures.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl PreferenceBackend for MemoryBackend {
    async fn load(&self) -> Result<Vec<PreferenceRecord>> {
        let guard = self
            .records
            .lock()
            .map_err(|_| anyhow!("memory backend lock poisoned"))?;
        Ok(guard.clone())
    }

    async fn save(&self, records: Vec<PreferenceRecord>) -> Result<()> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| anyhow!("memory backend lock poisoned"))?;
        *guard = records;
        Ok(())
    }

    async fn save_capture(&self, snapshot: CaptureSnapshot) -> Result<()> {
        let mut guard = self
            .captures
            .lock()
            .map_err(|_| anyhow!("memory backend lock poisoned"))?;
        guard.push(snapshot);
        Ok(())
    }
}
