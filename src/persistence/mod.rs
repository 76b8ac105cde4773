//! Pluggable storage for learned preferences.
//!
//! The engine never blocks on these calls: it updates its in-memory store
//! first and hands a snapshot to the backend on a spawned task, logging
//! and dropping any failure.

mod json_file;
mod memory;
mod writer;

pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;
pub use writer::PersistenceWriter;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{CaptureSnapshot, PreferenceRecord};

#[async_trait]
pub trait PreferenceBackend: Send + Sync {
    /// All records for the configured user. An empty vec is a cold start.
    async fn load(&self) -> Result<Vec<PreferenceRecord>>;

    /// Replace the stored records with `records`.
    async fn save(&self, records: Vec<PreferenceRecord>) -> Result<()>;

    /// Frozen filters attached to a capture or variant. Optional.
    async fn save_capture(&self, _snapshot: CaptureSnapshot) -> Result<()> {
        Ok(())
    }
}
