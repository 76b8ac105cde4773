use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::sync::{mpsc, oneshot};

use crate::models::{CaptureSnapshot, PreferenceRecord};

use super::PreferenceBackend;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

enum PersistJob {
    SaveRecords(Vec<PreferenceRecord>),
    SaveCapture(CaptureSnapshot),
    Flush(oneshot::Sender<()>),
}

/// Queues backend writes on a single background task.
///
/// Submitting never waits on the backend. Jobs run in submission order, so
/// the last record snapshot submitted is the one left on disk. Failures are
/// logged and dropped.
#[derive(Clone)]
pub struct PersistenceWriter {
    sender: mpsc::UnboundedSender<PersistJob>,
}

impl PersistenceWriter {
    /// Spawns the writer task. Must be called inside a tokio runtime.
    pub fn spawn(backend: Arc<dyn PreferenceBackend>) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<PersistJob>();

        tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                match job {
                    PersistJob::SaveRecords(records) => {
                        let count = records.len();
                        match backend.save(records).await {
                            Ok(()) => log_debug!("persisted {} preference records", count),
                            Err(err) => log_warn!("failed to persist preferences: {err:#}"),
                        }
                    }
                    PersistJob::SaveCapture(snapshot) => {
                        let id = snapshot.id.clone();
                        if let Err(err) = backend.save_capture(snapshot).await {
                            log_warn!("failed to persist capture {}: {err:#}", id);
                        }
                    }
                    PersistJob::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
            log_debug!("persistence writer stopped");
        });

        Self { sender }
    }

    pub fn save_records(&self, records: Vec<PreferenceRecord>) {
        if self.sender.send(PersistJob::SaveRecords(records)).is_err() {
            log_warn!("persistence writer is gone; preference snapshot dropped");
        }
    }

    pub fn save_capture(&self, snapshot: CaptureSnapshot) {
        if self.sender.send(PersistJob::SaveCapture(snapshot)).is_err() {
            log_warn!("persistence writer is gone; capture snapshot dropped");
        }
    }

    /// Resolves once every job submitted before this call has finished.
    pub async fn flush(&self) -> Result<()> {
        let (done_tx, done_rx) = oneshot::channel();
        self.sender
            .send(PersistJob::Flush(done_tx))
            .map_err(|_| anyhow!("persistence writer is gone"))?;
        done_rx
            .await
            .map_err(|_| anyhow!("persistence writer stopped before flushing"))
    }
}
