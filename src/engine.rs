use std::sync::Arc;

use anyhow::Result;
use image::RgbaImage;
use tokio::sync::Mutex;

use crate::models::Detection;
use crate::persistence::{PersistenceWriter, PreferenceBackend};
use crate::preferences::PreferenceStore;
use crate::session::{pipeline, Evaluation, Session, SessionController};
use crate::settings::EngineSettings;

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Entry point: the learned preference store plus the backend it is
/// persisted through. Sessions opened from one engine share its store.
pub struct TuningEngine {
    settings: EngineSettings,
    store: Arc<Mutex<PreferenceStore>>,
    writer: PersistenceWriter,
}

impl TuningEngine {
    /// Cold start. A backend that fails to load yields an empty store.
    pub async fn load(settings: EngineSettings, backend: Arc<dyn PreferenceBackend>) -> Self {
        let config = settings.preference_config();
        let records = match backend.load().await {
            Ok(records) => records,
            Err(err) => {
                log_warn!("failed to load preferences, starting empty: {err:#}");
                Vec::new()
            }
        };

        let store = PreferenceStore::from_records(records, config);
        log_info!(
            "preference store ready for user {} with {} record(s)",
            settings.user_id,
            store.len()
        );

        Self {
            settings,
            store: Arc::new(Mutex::new(store)),
            writer: PersistenceWriter::spawn(backend),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn store(&self) -> Arc<Mutex<PreferenceStore>> {
        Arc::clone(&self.store)
    }

    pub fn open_session(&self) -> SessionController {
        SessionController::new(
            &self.settings.default_mode,
            Arc::clone(&self.store),
            self.writer.clone(),
            self.settings.sampling_interval(),
            self.settings.render_interval(),
        )
    }

    /// One pipeline pass outside the loops. Learns nothing.
    pub async fn evaluate(
        &self,
        frame: &RgbaImage,
        detection: Option<&Detection>,
        session: &mut Session,
    ) -> Evaluation {
        let store = self.store.lock().await;
        pipeline::evaluate(frame, detection, &store, session)
    }

    /// Wait for every queued write to reach the backend.
    pub async fn flush(&self) -> Result<()> {
        self.writer.flush().await
    }
}
