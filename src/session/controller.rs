use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use image::RgbaImage;
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::compositor::filter_string;
use crate::models::{
    CaptureSnapshot, Detection, FilterOrigin, FilterParams, ManualAdjustments, PreviewFrame,
    SessionStatus,
};
use crate::persistence::PersistenceWriter;
use crate::preferences::{CaptureInput, PreferenceStore, RecordOutcome};
use crate::variants::{render_variants, VariantSet};

use super::feed::FrameFeed;
use super::loop_worker::{render_loop, sampling_loop};
use super::pipeline::{absorb, analyze, resolve};
use super::state::Session;

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// What a single capture hands back to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureResult {
    /// Frozen filters and sliders to attach to the output image.
    pub snapshot: CaptureSnapshot,
    pub css: String,
    /// `None` when nothing was learned: the frame had no usable region or no
    /// tracked object.
    #[serde(skip)]
    pub outcome: Option<RecordOutcome>,
}

struct VariantSource {
    session_id: String,
    mode: String,
    origin: FilterOrigin,
}

/// Owns one camera session: its state, its two loops and its pause flag.
pub struct SessionController {
    session: Arc<Mutex<Session>>,
    store: Arc<Mutex<PreferenceStore>>,
    writer: PersistenceWriter,
    feed: Arc<FrameFeed>,
    sampling_interval: Duration,
    render_interval: Duration,
    render_handle: Option<JoinHandle<()>>,
    sampling_handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
    pause_tx: watch::Sender<bool>,
    preview_tx: Arc<watch::Sender<Option<PreviewFrame>>>,
}

impl SessionController {
    pub fn new(
        mode: &str,
        store: Arc<Mutex<PreferenceStore>>,
        writer: PersistenceWriter,
        sampling_interval: Duration,
        render_interval: Duration,
    ) -> Self {
        let (pause_tx, _) = watch::channel(false);
        let (preview_tx, _) = watch::channel(None);
        Self {
            session: Arc::new(Mutex::new(Session::new(mode))),
            store,
            writer,
            feed: Arc::new(FrameFeed::new()),
            sampling_interval,
            render_interval,
            render_handle: None,
            sampling_handle: None,
            cancel_token: None,
            pause_tx,
            preview_tx: Arc::new(preview_tx),
        }
    }

    pub fn feed(&self) -> Arc<FrameFeed> {
        Arc::clone(&self.feed)
    }

    pub fn preview(&self) -> watch::Receiver<Option<PreviewFrame>> {
        self.preview_tx.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.render_handle.is_some() || self.sampling_handle.is_some()
    }

    pub fn is_paused(&self) -> bool {
        *self.pause_tx.borrow()
    }

    /// Hold both loops on their current state, e.g. while the app is in the
    /// background. Captures still run.
    pub fn set_paused(&self, paused: bool) {
        if self.pause_tx.send_replace(paused) != paused {
            log_info!("session loops {}", if paused { "paused" } else { "resumed" });
        }
    }

    pub async fn snapshot(&self) -> Session {
        self.session.lock().await.clone()
    }

    pub async fn status(&self) -> SessionStatus {
        self.session.lock().await.status
    }

    pub async fn start(&mut self) -> Result<()> {
        if self.is_running() {
            bail!("session loops already running");
        }

        {
            let mut session = self.session.lock().await;
            if session.status == SessionStatus::Closed {
                bail!("session {} is closed", session.id);
            }
            session.status = SessionStatus::Live;
            log_info!("starting session {} in mode {}", session.id, session.mode);
        }

        let cancel_token = CancellationToken::new();

        let render_handle = tokio::spawn(render_loop(
            Arc::clone(&self.session),
            Arc::clone(&self.preview_tx),
            self.render_interval,
            cancel_token.clone(),
            self.pause_tx.subscribe(),
        ));
        let sampling_handle = tokio::spawn(sampling_loop(
            Arc::clone(&self.session),
            Arc::clone(&self.store),
            Arc::clone(&self.feed),
            self.sampling_interval,
            cancel_token.clone(),
            self.pause_tx.subscribe(),
        ));

        self.render_handle = Some(render_handle);
        self.sampling_handle = Some(sampling_handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Stop both loops and throw away the session's scene state. Nothing is
    /// persisted.
    pub async fn close(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        let mut join_result = Ok(());
        for handle in [self.render_handle.take(), self.sampling_handle.take()]
            .into_iter()
            .flatten()
        {
            if let Err(err) = handle.await.context("session loop task failed to join") {
                join_result = Err(err);
            }
        }

        {
            let mut session = self.session.lock().await;
            session.discard();
            session.status = SessionStatus::Closed;
            log_info!("closed session {}", session.id);
        }
        self.preview_tx.send_replace(None);
        self.pause_tx.send_replace(false);

        join_result
    }

    /// Run one strictly sequential pass on the current frame and learn from it.
    pub async fn capture(&self, liked: bool) -> Result<CaptureResult> {
        let Some(frame) = self.feed.latest_frame() else {
            bail!("no frame available to capture");
        };
        let detection = self.feed.latest_detection();

        let was_paused = self.pause_tx.send_replace(true);
        let result = self.capture_frame(frame, detection, liked).await;
        self.pause_tx.send_replace(was_paused);
        result
    }

    async fn capture_frame(
        &self,
        frame: Arc<RgbaImage>,
        detection: Option<Detection>,
        liked: bool,
    ) -> Result<CaptureResult> {
        let analysis = tokio::task::spawn_blocking(move || analyze(&frame, detection.as_ref()))
            .await
            .context("capture worker join failed")?;

        let mut session = self.session.lock().await;
        if session.status == SessionStatus::Closed {
            bail!("session {} is closed", session.id);
        }

        let (outcome, records) = {
            let mut store = self.store.lock().await;
            let evaluation = resolve(analysis, &store, session.preset(), &session.manual);
            absorb(&mut session, &evaluation);

            let tracked = evaluation.applied.is_some();
            let outcome = evaluation.analysis.filter(|_| tracked).map(|analysis| {
                store.record(CaptureInput {
                    context: analysis.context,
                    settings: analysis.settings,
                    filters: session.filters,
                    mode: session.mode.clone(),
                    manual_adjustments: session.manual,
                    liked,
                })
            });
            let records = outcome.as_ref().map(|_| store.records().to_vec());
            (outcome, records)
        };

        let snapshot = CaptureSnapshot {
            id: Uuid::new_v4().to_string(),
            session_id: session.id.clone(),
            record_id: outcome.as_ref().map(|o| o.record_id.clone()),
            variant: None,
            mode: session.mode.clone(),
            origin: session.origin,
            filters: session.filters,
            manual_adjustments: session.manual,
            liked,
            taken_at: Utc::now(),
        };
        drop(session);

        match &outcome {
            Some(outcome) => log_info!(
                "capture {} -> record {} (merged={}, usage={})",
                snapshot.id,
                outcome.record_id,
                outcome.merged,
                outcome.usage_count
            ),
            None => log_warn!(
                "capture {} had no tracked region; nothing learned",
                snapshot.id
            ),
        }

        if let Some(records) = records {
            self.writer.save_records(records);
        }
        self.writer.save_capture(snapshot.clone());

        Ok(CaptureResult {
            css: filter_string(&snapshot.filters),
            snapshot,
            outcome,
        })
    }

    /// Like a record after the fact. Returns false for an unknown id.
    pub async fn like(&self, record_id: &str) -> bool {
        let records = {
            let mut store = self.store.lock().await;
            if !store.mark_liked(record_id) {
                return false;
            }
            store.records().to_vec()
        };
        self.writer.save_records(records);
        true
    }

    pub async fn set_mode(&self, mode: &str) -> FilterParams {
        self.session.lock().await.set_mode(mode)
    }

    pub async fn set_manual(&self, manual: ManualAdjustments) -> FilterParams {
        self.session.lock().await.set_manual(manual)
    }

    pub async fn reset_manual(&self) -> FilterParams {
        self.session.lock().await.reset_manual()
    }

    /// Render the five variants of the current frame.
    ///
    /// Both loops are paused for the duration. The previous pause state is
    /// restored afterwards whether or not rendering succeeded.
    pub async fn multi_capture(&self) -> Result<VariantSet> {
        let was_paused = self.pause_tx.send_replace(true);
        let result = self.render_variant_set().await;

        {
            let mut session = self.session.lock().await;
            if session.status == SessionStatus::MultiCapture {
                session.status = if self.is_running() {
                    SessionStatus::Live
                } else {
                    SessionStatus::Idle
                };
            }
        }
        self.pause_tx.send_replace(was_paused);

        let (source, set) = result?;
        for variant in &set.variants {
            self.writer.save_capture(CaptureSnapshot {
                id: Uuid::new_v4().to_string(),
                session_id: source.session_id.clone(),
                record_id: None,
                variant: Some(variant.id().to_string()),
                mode: source.mode.clone(),
                origin: source.origin,
                filters: variant.filters,
                manual_adjustments: variant.user_adjustments,
                liked: false,
                taken_at: Utc::now(),
            });
        }
        Ok(set)
    }

    async fn render_variant_set(&self) -> Result<(VariantSource, VariantSet)> {
        let Some(frame) = self.feed.latest_frame() else {
            bail!("no frame available for multi-capture");
        };

        let (source, live, manual) = {
            let mut session = self.session.lock().await;
            if session.status == SessionStatus::Closed {
                bail!("session {} is closed", session.id);
            }
            session.status = SessionStatus::MultiCapture;
            let source = VariantSource {
                session_id: session.id.clone(),
                mode: session.mode.clone(),
                origin: session.origin,
            };
            (source, session.filters, session.manual)
        };
        let origin = source.origin;

        let set = tokio::task::spawn_blocking(move || {
            render_variants(frame, &live, &manual, origin)
        })
        .await
        .context("variant worker join failed")?;

        if set.is_empty() {
            bail!("every variant failed to render");
        }
        Ok((source, set))
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }
}
