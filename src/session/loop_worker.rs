use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::sync::{watch, Mutex};
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::compositor::filter_string;
use crate::models::{PreviewFrame, SessionStatus};
use crate::preferences::PreferenceStore;

use super::feed::FrameFeed;
use super::pipeline::{absorb, analyze, resolve};
use super::state::Session;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

const SAMPLING_TIMEOUT_MS: u64 = 2_000;

/// Publishes the current filters on every display tick.
///
/// Never waits on a sampling pass: it reads whatever filters the session
/// holds at that moment.
pub async fn render_loop(
    session: Arc<Mutex<Session>>,
    preview_tx: Arc<watch::Sender<Option<PreviewFrame>>>,
    interval: Duration,
    cancel_token: CancellationToken,
    pause_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if *pause_rx.borrow() {
                    continue;
                }

                let (filters, origin) = {
                    let guard = session.lock().await;
                    (guard.filters, guard.origin)
                };

                let unchanged = preview_tx
                    .borrow()
                    .as_ref()
                    .is_some_and(|frame| frame.filters == filters && frame.origin == origin);
                if unchanged {
                    continue;
                }

                preview_tx.send_replace(Some(PreviewFrame {
                    filters,
                    origin,
                    css: filter_string(&filters),
                    rendered_at: Utc::now(),
                }));
            }
            _ = cancel_token.cancelled() => {
                log_info!("render loop shutting down");
                break;
            }
        }
    }
}

/// Samples the latest frame at a low rate and recomposites the live filters.
pub async fn sampling_loop(
    session: Arc<Mutex<Session>>,
    store: Arc<Mutex<PreferenceStore>>,
    feed: Arc<FrameFeed>,
    interval: Duration,
    cancel_token: CancellationToken,
    pause_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if *pause_rx.borrow() {
                    continue;
                }

                let fut = perform_sampling(&session, &store, &feed, &pause_rx);
                match tokio::time::timeout(Duration::from_millis(SAMPLING_TIMEOUT_MS), fut).await {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => log_warn!("sampling pass failed: {err:#}"),
                    Err(_) => log_warn!("sampling pass timeout (> {}ms)", SAMPLING_TIMEOUT_MS),
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("sampling loop shutting down");
                break;
            }
        }
    }
}

async fn perform_sampling(
    session: &Arc<Mutex<Session>>,
    store: &Arc<Mutex<PreferenceStore>>,
    feed: &FrameFeed,
    pause_rx: &watch::Receiver<bool>,
) -> Result<()> {
    let Some(frame) = feed.latest_frame() else {
        return Ok(());
    };
    let detection = feed.latest_detection();

    let started = Instant::now();
    let analysis = tokio::task::spawn_blocking(move || analyze(&frame, detection.as_ref()))
        .await
        .context("sampling worker join failed")?;

    // multi-capture may have started while the pixels were being read
    if *pause_rx.borrow() {
        return Ok(());
    }

    let mut session = session.lock().await;
    if session.status != SessionStatus::Live {
        return Ok(());
    }

    let evaluation = {
        let store = store.lock().await;
        resolve(analysis, &store, session.preset(), &session.manual)
    };
    absorb(&mut session, &evaluation);

    log_debug!(
        "sampled in {}ms: origin={} filters={:?}",
        started.elapsed().as_millis(),
        session.origin.as_str(),
        session.filters
    );
    Ok(())
}
